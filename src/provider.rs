use std::borrow::Borrow;
use std::sync::Arc;

use crate::error::SqlTemplateError;

/// Source of fresh database connections.
///
/// The template acquires one connection per operation and drops it before returning, so a
/// provider backed by a pool gets every connection back. Implementations must tolerate
/// concurrent `acquire` calls.
pub trait ConnectionProvider: Send + Sync {
    /// Handle yielded to the template; dropping it releases the connection.
    type Connection: Borrow<rusqlite::Connection>;

    /// Obtain a connection for one operation.
    ///
    /// # Errors
    /// Returns `SqlTemplateError` if no connection can be produced.
    fn acquire(&self) -> Result<Self::Connection, SqlTemplateError>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for Arc<P> {
    type Connection = P::Connection;

    fn acquire(&self) -> Result<Self::Connection, SqlTemplateError> {
        (**self).acquire()
    }
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    type Connection = P::Connection;

    fn acquire(&self) -> Result<Self::Connection, SqlTemplateError> {
        (**self).acquire()
    }
}
