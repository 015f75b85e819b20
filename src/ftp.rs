//! FTP transport for project files.
//!
//! Every operation opens a fresh connection, logs in with the decrypted
//! project password, changes into the project directory and closes the
//! session afterwards. `suppaftp` is blocking, so sessions run on the
//! blocking thread pool.

use std::io::Cursor;
use std::net::ToSocketAddrs;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use suppaftp::list::File as ListEntry;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, info, warn};

use crate::crypto::PasswordCipher;
use crate::domain::Project;
use crate::error::{EditorError, Result};
use crate::metrics::{self, MetricName};

const NON_ASCII_HINT: &str = " (hint: the path contains non-ASCII characters, which this server may not \
     recognise; try renaming the folder or file with ASCII letters and digits)";

/// Connection details for one project site.
#[derive(Debug, Clone)]
pub struct FtpConfig {
    pub host: String,
    pub user: String,
    pub encrypted_password: String,
    pub port: u16,
    pub path: String,
}

impl From<&Project> for FtpConfig {
    fn from(project: &Project) -> Self {
        Self {
            host: project.ftp_host.clone(),
            user: project.ftp_user.clone(),
            encrypted_password: project.ftp_password_encrypted.clone(),
            port: project.ftp_port,
            path: project.ftp_path.clone(),
        }
    }
}

/// Remote file access used by the HTTP layer.
#[async_trait]
pub trait RemoteFiles: Send + Sync {
    async fn read_file(&self, config: &FtpConfig, path: &str) -> Result<String>;
    async fn write_file(&self, config: &FtpConfig, path: &str, content: &str) -> Result<()>;
    /// Names of the non-directory entries in `dir` (the project directory when `None`).
    async fn list_files(&self, config: &FtpConfig, dir: Option<&str>) -> Result<Vec<String>>;
    async fn test_connection(&self, config: &FtpConfig) -> bool;
}

pub struct FtpClient {
    cipher: Arc<PasswordCipher>,
    timeout: Duration,
}

impl FtpClient {
    pub fn new(cipher: Arc<PasswordCipher>, timeout: Duration) -> Self {
        Self { cipher, timeout }
    }

    /// Decrypt the password and run `op` inside a session on the blocking pool.
    async fn run<T, F>(&self, config: &FtpConfig, path: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut FtpStream) -> std::result::Result<T, FtpError> + Send + 'static,
    {
        let password = self.cipher.decrypt(&config.encrypted_password)?;
        let config = config.clone();
        let path = path.to_string();
        let timeout = self.timeout;

        tokio::task::spawn_blocking(move || with_session(&config, &password, timeout, &path, op)).await?
    }
}

fn with_session<T, F>(
    config: &FtpConfig,
    password: &str,
    timeout: Duration,
    path: &str,
    op: F,
) -> Result<T>
where
    F: FnOnce(&mut FtpStream) -> std::result::Result<T, FtpError>,
{
    let addr = (config.host.as_str(), config.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| EditorError::Ftp(format!("could not resolve host {}", config.host)))?;

    let mut ftp = FtpStream::connect_timeout(addr, timeout).map_err(|e| describe(e, path))?;
    ftp.get_ref().set_read_timeout(Some(timeout))?;
    ftp.get_ref().set_write_timeout(Some(timeout))?;

    let result = prepare(&mut ftp, config, password)
        .and_then(|()| op(&mut ftp))
        .map_err(|e| describe(e, path));

    if let Err(e) = ftp.quit() {
        debug!("FTP quit failed for {}: {}", config.host, e);
    }
    result
}

fn prepare(ftp: &mut FtpStream, config: &FtpConfig, password: &str) -> std::result::Result<(), FtpError> {
    ftp.login(config.user.as_str(), password)?;
    if !config.path.is_empty() {
        ftp.cwd(&config.path)?;
    }
    ftp.transfer_type(FileType::Binary)
}

/// Wrap an FTP failure, adding a hint when a 550 reply concerns a non-ASCII path.
fn describe(err: FtpError, path: &str) -> EditorError {
    let mut message = err.to_string();
    if message.contains("550") && !path.is_ascii() {
        message.push_str(NON_ASCII_HINT);
    }
    EditorError::Ftp(message)
}

fn file_names(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| match ListEntry::from_str(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unparsable LIST line {:?}: {}", line, e);
                None
            }
        })
        .filter(|entry| !entry.is_directory())
        .map(|entry| entry.name().to_string())
        .collect()
}

fn record<T>(result: &Result<T>, success: MetricName, failure: MetricName) {
    metrics::increment(if result.is_ok() { success } else { failure });
}

#[async_trait]
impl RemoteFiles for FtpClient {
    async fn read_file(&self, config: &FtpConfig, path: &str) -> Result<String> {
        let remote = path.to_string();
        let result = self
            .run(config, path, move |ftp| {
                let buffer = ftp.retr_as_buffer(&remote)?;
                Ok(String::from_utf8_lossy(&buffer.into_inner()).into_owned())
            })
            .await;

        record(&result, MetricName::FtpReadSuccess, MetricName::FtpReadError);
        match &result {
            Ok(content) => info!("Read {} ({} bytes) from {}", path, content.len(), config.host),
            Err(e) => warn!("Failed to read {} from {}: {}", path, config.host, e),
        }
        result
    }

    async fn write_file(&self, config: &FtpConfig, path: &str, content: &str) -> Result<()> {
        let remote = path.to_string();
        let bytes = content.as_bytes().to_vec();
        let result = self
            .run(config, path, move |ftp| {
                ftp.put_file(&remote, &mut Cursor::new(bytes))?;
                Ok(())
            })
            .await;

        record(&result, MetricName::FtpWriteSuccess, MetricName::FtpWriteError);
        match &result {
            Ok(()) => info!("Wrote {} ({} bytes) to {}", path, content.len(), config.host),
            Err(e) => warn!("Failed to write {} to {}: {}", path, config.host, e),
        }
        result
    }

    async fn list_files(&self, config: &FtpConfig, dir: Option<&str>) -> Result<Vec<String>> {
        let dir = dir.filter(|d| !d.is_empty()).unwrap_or(".").to_string();
        let listed = dir.clone();
        let result = self
            .run(config, &dir, move |ftp| ftp.list(Some(listed.as_str())))
            .await
            .map(|lines| file_names(&lines));

        record(&result, MetricName::FtpListSuccess, MetricName::FtpListError);
        if let Err(e) = &result {
            warn!("Failed to list {} on {}: {}", dir, config.host, e);
        }
        result
    }

    async fn test_connection(&self, config: &FtpConfig) -> bool {
        match self.run(config, "", |_| Ok(())).await {
            Ok(()) => true,
            Err(e) => {
                warn!("FTP connection test failed for {}: {}", config.host, e);
                false
            }
        }
    }
}
