/// Basic type of errors returned by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumConvertFromInt, EnumError)]
#[EnumConvertFromIntFallback = "Unimplemented"]
pub enum ZkError {
    /// This code is never returned from the server. It should not be used other than to indicate a
    /// range. Specifically error codes greater than this value are API errors (while values less
    /// than this indicate a system error).
    APIError = -100,
    /// Client authentication failed.
    AuthFailed = -115,
    /// Invalid arguments.
    BadArguments = -8,
    /// Version conflict in `set` operation. In case of reconfiguration: reconfig requested from
    /// config version X but last seen config has a different version Y.
    BadVersion = -103,
    /// Connection to the server has been lost.
    ConnectionLoss = -4,
    /// A data inconsistency was found.
    DataInconsistency = -3,
    /// Invalid `Acl` specified.
    InvalidAcl = -114,
    /// Error while marshalling or unmarshalling data.
    MarshallingError = -5,
    /// Not authenticated.
    NoAuth = -102,
    /// Ephemeral nodes may not have children.
    NoChildrenForEphemerals = -108,
    /// The node already exists.
    NodeExists = -110,
    /// Node does not exist.
    NoNode = -101,
    /// The node has children.
    NotEmpty = -111,
    /// State-changing request is passed to read-only server.
    NotReadOnly = -119,
    /// Operation timeout.
    OperationTimeout = -7,
    /// A runtime inconsistency was found.
    RuntimeInconsistency = -2,
    /// The session has been expired by the server.
    SessionExpired = -112,
    /// Session moved to another server, so operation is ignored.
    SessionMoved = -118,
    /// System and server-side errors. This is never thrown by the server. It shouldn't be used
    /// other than to indicate a range. Specifically error codes greater than this value, but lesser
    /// than `APIError`, are system errors.
    SystemError = -1,
    /// Operation is unimplemented. Also the classification given to error codes this library does
    /// not recognize, since the set of codes is owned by an evolving protocol.
    Unimplemented = -6,
}

/// CreateMode value determines how the znode is created on the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateMode {
    /// The znode will not be automatically deleted upon client's disconnect.
    Persistent = 0,
    /// The znode will be deleted upon the client's disconnect.
    Ephemeral = 1,
    /// The name of the znode will be appended with a monotonically increasing number. The actual
    /// path name of a sequential node will be the given path plus a suffix `i` where `i` is the
    /// current sequential number of the node.
    PersistentSequential = 2,
    /// The znode will be deleted upon the client's disconnect, and its name will be appended with a
    /// monotonically increasing number.
    EphemeralSequential = 3,
}

#[cfg(test)]
mod tests {
    use super::ZkError;

    #[test]
    fn error_code_conversion() {
        assert_eq!(ZkError::from(-103), ZkError::BadVersion);
        assert_eq!(ZkError::from(-110), ZkError::NodeExists);
        assert_eq!(ZkError::from(-4), ZkError::ConnectionLoss);
    }

    #[test]
    fn unknown_error_code_falls_back() {
        assert_eq!(ZkError::from(-999), ZkError::Unimplemented);
        assert_eq!(ZkError::from(42), ZkError::Unimplemented);
    }
}
