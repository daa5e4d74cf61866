use crate::backend::DatabaseType;

/// Configuration for database backends
#[derive(Debug, Clone)]
pub struct DatabaseBackendConfig {
    /// The type of database backend to use
    pub database_type: DatabaseType,

    /// Connection URL for the storage backend
    /// Examples: "sqlite:./scim.db", "./scim.db", ":memory:"
    pub connection_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseBackendConfig {
    pub fn new(database_type: DatabaseType, connection_url: String) -> Self {
        Self {
            database_type,
            connection_url,
            max_connections: 10,
            connection_timeout: 30,
        }
    }

    pub fn sqlite(connection_url: String) -> Self {
        Self::new(DatabaseType::SQLite, connection_url)
    }

    /// In-memory SQLite configuration for testing
    pub fn memory_sqlite() -> Self {
        Self::new(DatabaseType::SQLite, ":memory:".to_string()).with_max_connections(1)
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_connection_timeout(mut self, timeout_seconds: u64) -> Self {
        self.connection_timeout = timeout_seconds;
        self
    }

    /// Check if this is an in-memory database
    pub fn is_memory_database(&self) -> bool {
        matches!(
            self.connection_url.as_str(),
            ":memory:" | "sqlite::memory:" | "sqlite://:memory:"
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connection_url.is_empty() {
            return Err("Connection URL cannot be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("Max connections must be greater than 0".to_string());
        }

        match self.database_type {
            DatabaseType::SQLite => {
                if !self.connection_url.starts_with("sqlite:")
                    && !self.is_memory_database()
                    && !self.connection_url.ends_with(".db")
                    && !self.connection_url.ends_with(".sqlite")
                {
                    return Err("SQLite connection URL must start with 'sqlite:', be ':memory:', or end with '.db' or '.sqlite'".to_string());
                }
            }
        }

        Ok(())
    }
}

impl Default for DatabaseBackendConfig {
    fn default() -> Self {
        Self::memory_sqlite()
    }
}
