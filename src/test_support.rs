use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

pub(crate) const ENV_YML: &str = "env:\n  NGINX_VERSION: \"1.27.4\"\n  OPENSSL_BRANCH: \"feature/ech\"\n";

pub(crate) const WORKFLOW_YML: &str = "on: push\njobs:\n  build:\n    steps:\n      - run: echo ${{ env.NGINX_VERSION }}\n";

pub(crate) const README_TPL: &str = "# nginx {{NGINX_VERSION}}\n\nOpenSSL branch: `{{OPENSSL_BRANCH}}`\n";

pub(crate) const README_RENDERED: &str = "# nginx 1.27.4\n\nOpenSSL branch: `feature/ech`\n";

/// A repository laid out the way the default config expects:
/// `template/env.yml`, `template/build-nginx-ech.yml`, `template/README.md`.
pub(crate) fn create_template_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("template");
    fs::create_dir_all(&template).unwrap();
    fs::create_dir(temp_dir.path().join(".git")).unwrap();

    fs::write(template.join("env.yml"), ENV_YML).unwrap();
    fs::write(template.join("build-nginx-ech.yml"), WORKFLOW_YML).unwrap();
    fs::write(template.join("README.md"), README_TPL).unwrap();

    temp_dir
}
