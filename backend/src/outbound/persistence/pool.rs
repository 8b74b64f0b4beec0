//! bb8 pool of `diesel-async` PostgreSQL connections.

use std::fmt;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::domain::ports::define_port_error;

define_port_error! {
    /// Pool construction or checkout failure.
    pub enum PoolError {
        /// The pool could not open its initial connections.
        Build { message: String } => "failed to build connection pool: {message}",
        /// No connection became free before the checkout timeout.
        Checkout { message: String } => "failed to get connection from pool: {message}",
    }
}

const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where to connect and how many connections to keep.
///
/// The admin API serves one operator, so the defaults are small.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use devassist::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/devassist")
///     .with_max_size(4)
///     .with_checkout_timeout(Duration::from_secs(5));
/// assert_eq!(config.database_url(), "postgres://localhost/devassist");
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_CONNECTIONS,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap on open connections; zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

// The URL usually embeds a password.
impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("max_size", &self.max_size)
            .field("checkout_timeout", &self.checkout_timeout)
            .finish_non_exhaustive()
    }
}

/// Cloneable handle shared by the Diesel repositories.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when the initial connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_size,
            checkout_timeout,
        } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        Pool::builder()
            .max_size(max_size)
            .connection_timeout(checkout_timeout)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|error| PoolError::build(error.to_string()))
    }

    /// Borrow a connection for one repository call.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when the checkout timeout elapses.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|error| PoolError::checkout(error.to_string()))
    }
}
