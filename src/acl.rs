use std::fmt;
use std::ops;

/// Describes the ability of a user to perform a certain action.
///
/// Permissions can be mixed together like integers with `|` and `&`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Permission(u32);

impl Permission {
    /// No permissions are set (server could have been configured without ACL support).
    pub const NONE: Permission = Permission(0b00000);
    /// You can access the data of a node and can list its children.
    pub const READ: Permission = Permission(0b00001);
    /// You can set the data of a node.
    pub const WRITE: Permission = Permission(0b00010);
    /// You can create a child node.
    pub const CREATE: Permission = Permission(0b00100);
    /// You can delete a child node (but not necessarily this one).
    pub const DELETE: Permission = Permission(0b01000);
    /// You can alter permissions on this node.
    pub const ADMIN: Permission = Permission(0b10000);
    /// You can do anything.
    pub const ALL: Permission = Permission(0b11111);

    /// Extract a permission value from raw `bits`.
    pub fn from_raw(bits: u32) -> Permission {
        Permission(bits)
    }

    /// Express the permission as raw transferable bits.
    pub fn code(self) -> u32 {
        self.0
    }

    /// Check that all `permissions` are set.
    ///
    /// ```
    /// use zkmulti::Permission;
    ///
    /// (Permission::READ | Permission::WRITE).can(Permission::WRITE); // -> true
    /// Permission::ADMIN.can(Permission::CREATE); // -> false
    /// ```
    pub fn can(self, permissions: Permission) -> bool {
        (self & permissions) == permissions
    }
}

impl ops::BitAnd for Permission {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Permission::from_raw(self.0 & rhs.0)
    }
}

impl ops::BitOr for Permission {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Permission::from_raw(self.0 | rhs.0)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == Permission::ALL {
            write!(f, "ALL")
        } else if *self == Permission::NONE {
            write!(f, "NONE")
        } else {
            let mut sep = "";
            for &(permission, name) in &[
                (Permission::READ, "READ"),
                (Permission::WRITE, "WRITE"),
                (Permission::CREATE, "CREATE"),
                (Permission::DELETE, "DELETE"),
                (Permission::ADMIN, "ADMIN"),
            ] {
                if self.can(permission) {
                    write!(f, "{}{}", sep, name)?;
                    sep = "|";
                }
            }
            Ok(())
        }
    }
}

/// An access control list entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Acl {
    /// The permissions associated with this ACL.
    pub perms: Permission,
    /// The scheme the `id` belongs to, such as `"world"`, `"auth"` or `"digest"`.
    pub scheme: String,
    /// The ID of the user under the `scheme`, such as `"anyone"`.
    pub id: String,
}

impl Acl {
    /// Create a new ACL with the given `permissions`, `scheme` and `id`.
    pub fn new<T, U>(permissions: Permission, scheme: T, id: U) -> Acl
    where
        T: ToString,
        U: ToString,
    {
        Acl {
            perms: permissions,
            scheme: scheme.to_string(),
            id: id.to_string(),
        }
    }

    /// This ACL gives the creator's authentication ID all permissions.
    pub fn creator_all() -> &'static Vec<Acl> {
        &ACL_CREATOR_ALL
    }

    /// This is a completely open ACL.
    pub fn open_unsafe() -> &'static Vec<Acl> {
        &ACL_OPEN_UNSAFE
    }

    /// This ACL gives the world the ability to read.
    pub fn read_unsafe() -> &'static Vec<Acl> {
        &ACL_READ_UNSAFE
    }
}

lazy_static! {
    static ref ACL_CREATOR_ALL: Vec<Acl> = vec![Acl::new(Permission::ALL, "auth", "")];
    static ref ACL_OPEN_UNSAFE: Vec<Acl> = vec![Acl::new(Permission::ALL, "world", "anyone")];
    static ref ACL_READ_UNSAFE: Vec<Acl> = vec![Acl::new(Permission::READ, "world", "anyone")];
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}:{}, {})", self.scheme, self.id, self.perms)
    }
}
