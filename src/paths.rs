use crate::consts::ZkError;
use crate::transport::ZkResult;

/// Validate the provided znode path string.
///
/// A valid path is absolute, does not end with a slash (except the root
/// itself), and contains no empty, `.` or `..` segments and no NUL bytes.
pub fn validate_path(path: &str) -> ZkResult<()> {
    if !path.starts_with('/') {
        debug!("path {:?} must start with /", path);
        return Err(ZkError::BadArguments);
    }
    if path.len() == 1 {
        // the root
        return Ok(());
    }
    if path.ends_with('/') {
        debug!("path {:?} must not end with /", path);
        return Err(ZkError::BadArguments);
    }
    for segment in path[1..].split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\0') {
            debug!("path {:?} contains an illegal segment {:?}", path, segment);
            return Err(ZkError::BadArguments);
        }
    }
    Ok(())
}

/// Client-side namespace translation.
///
/// A chroot prefixes every outgoing path with a fixed root and strips that
/// root from paths the server hands back, so several clients can share one
/// store under isolated subtrees while each sees its own paths as absolute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chroot {
    root: String,
}

impl Chroot {
    /// A chroot that performs no translation.
    pub fn none() -> Chroot {
        Chroot { root: String::new() }
    }

    /// A chroot rooted at `root`. `""` and `"/"` mean no translation;
    /// anything else must be a valid znode path.
    pub fn new(root: &str) -> ZkResult<Chroot> {
        if root.is_empty() || root == "/" {
            return Ok(Chroot::none());
        }
        validate_path(root)?;
        Ok(Chroot { root: root.to_string() })
    }

    /// Translate a client path into the form sent to the server.
    pub fn fix(&self, path: &str) -> String {
        if self.root.is_empty() {
            path.to_string()
        } else if path == "/" {
            self.root.clone()
        } else {
            format!("{}{}", self.root, path)
        }
    }

    /// Undo [`Chroot::fix`] on a path returned by the server.
    ///
    /// Paths outside the chroot are passed through unchanged.
    pub fn unfix(&self, path: &str) -> String {
        if self.root.is_empty() {
            return path.to_string();
        }
        match path.strip_prefix(&self.root) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => path.to_string(),
        }
    }
}
