use public_transport::database::DatabaseError;

pub mod point;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => DatabaseError::Unavailable(Box::new(why)),
        _ => DatabaseError::Other(Box::new(why)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_connections_are_unavailable() {
        assert!(matches!(
            convert_error(sqlx::Error::PoolTimedOut),
            DatabaseError::Unavailable(_)
        ));
        assert!(matches!(
            convert_error(sqlx::Error::RowNotFound),
            DatabaseError::Other(_)
        ));
    }
}
