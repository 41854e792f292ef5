//! CLI command implementations.

use nitro_client::storage::keys;
use nitro_client::{
    ApiError, AuthError, Config, FileReadError, LocalStorage, SessionManager, UploadCoordinator,
    UploadError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::i18n;
use crate::terminal::TerminalPresenter;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    FileRead(#[from] FileReadError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{} is not a .{extension} file", path.display())]
    UnsupportedFile { path: PathBuf, extension: String },

    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Everything a command needs: config, storage, UI and the session.
pub struct Context {
    pub config: Config,
    pub storage: Arc<dyn LocalStorage>,
    pub presenter: Arc<TerminalPresenter>,
    pub session: SessionManager,
}

impl Context {
    /// Builds the context. The UI language comes from storage or the system.
    pub fn new(config: Config, storage: Arc<dyn LocalStorage>) -> Result<Self> {
        let locale = i18n::startup_locale(storage.as_ref());
        let presenter = Arc::new(TerminalPresenter::new(locale));
        let session = SessionManager::new(config.clone(), storage.clone(), presenter.clone())?;
        Ok(Self {
            config,
            storage,
            presenter,
            session,
        })
    }

    fn say(&self, key: &str) {
        println!("{}", self.presenter.text(key));
    }

    fn complain(&self, key: &str) {
        eprintln!("{}", self.presenter.text(key));
    }
}

/// Log in with a username and password.
pub async fn login(ctx: &Context, username: &str, password: &str) -> Result<()> {
    match ctx.session.login(username, password).await {
        Ok(user_id) => {
            tracing::debug!(user_id, "Login command finished");
            Ok(())
        }
        Err(e) => {
            // The session reports request failures itself.
            if matches!(e, AuthError::AlreadyAuthenticated | AuthError::InProgress) {
                ctx.complain(e.message_key());
            }
            Err(e.into())
        }
    }
}

/// Log out and forget the stored token.
pub async fn logout(ctx: &mut Context) -> Result<()> {
    if !ctx.session.handle().is_authenticated() {
        ctx.say("whoami-anon");
        return Ok(());
    }
    ctx.session.logout().await?;
    ctx.say("logout-success");
    Ok(())
}

/// Show who is signed in.
pub fn whoami(ctx: &Context) -> Result<()> {
    match ctx.session.handle().user_id() {
        Some(user_id) => println!("{} {user_id}", ctx.presenter.text("whoami-user")),
        None => ctx.say("whoami-anon"),
    }
    Ok(())
}

/// Upload `path` as the signed-in user's avatar.
pub async fn upload(ctx: &Context, path: &Path) -> Result<()> {
    if !ctx.config.accepts_file(path) {
        ctx.complain("upload-filetype");
        return Err(CliError::UnsupportedFile {
            path: path.to_path_buf(),
            extension: ctx.config.avatar_extension.clone(),
        });
    }

    let uploads = UploadCoordinator::new(ctx.presenter.clone());
    let pending = uploads.select_file(path).await?;

    let task = uploads
        .submit(&pending, &ctx.session.handle(), &ctx.session.adapter())
        .inspect_err(|e| ctx.complain(e.message_key()))?;
    task.run().await?;
    Ok(())
}

/// List languages, or switch to `code`.
pub fn lang(ctx: &Context, code: Option<&str>) -> Result<()> {
    let Some(code) = code else {
        for (code, name) in i18n::languages() {
            let marker = if code == ctx.presenter.locale() { "*" } else { " " };
            println!("{marker} {code:<5} {name}");
        }
        return Ok(());
    };

    if !i18n::is_known(code) {
        ctx.complain("lang-unknown");
        return Err(CliError::UnknownLanguage(code.to_string()));
    }

    ctx.storage.set_item(keys::LANG, code);
    println!("{}", i18n::resolve("lang-set", code));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nitro_client::MemoryStorage;

    fn context(storage: Arc<MemoryStorage>) -> Context {
        let config = Config {
            service_url: "http://127.0.0.1:9/".to_string(),
            ..Config::default()
        };
        Context::new(config, storage).unwrap()
    }

    #[test]
    fn test_context_uses_stored_language() {
        let storage = Arc::new(MemoryStorage::with_items([(keys::LANG, "de")]));
        let ctx = context(storage);
        assert_eq!(ctx.presenter.locale(), "de");
    }

    #[test]
    fn test_lang_persists_known_language() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = context(storage.clone());

        lang(&ctx, Some("fr")).unwrap();

        assert_eq!(storage.get_item(keys::LANG).as_deref(), Some("fr"));
    }

    #[test]
    fn test_lang_rejects_unknown_language() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = context(storage.clone());

        let err = lang(&ctx, Some("tlh")).unwrap_err();

        assert!(matches!(err, CliError::UnknownLanguage(code) if code == "tlh"));
        assert_eq!(storage.get_item(keys::LANG), None);
    }

    #[tokio::test]
    async fn test_upload_rejects_wrong_extension_before_reading() {
        let ctx = context(Arc::new(MemoryStorage::new()));

        let err = upload(&ctx, Path::new("/tmp/avatar.png")).await.unwrap_err();

        assert!(matches!(err, CliError::UnsupportedFile { .. }));
    }

    #[tokio::test]
    async fn test_upload_requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("avatar.gif");
        std::fs::write(&file, b"GIF89a").unwrap();
        let ctx = context(Arc::new(MemoryStorage::new()));

        let err = upload(&ctx, &file).await.unwrap_err();

        assert!(matches!(err, CliError::Upload(UploadError::NotAuthenticated)));
    }
}
