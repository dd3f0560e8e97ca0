//! Structured sample values: system call traces and open-file snapshots.

use serde::{Deserialize, Serialize};

/// One traced system call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strace {
    /// Calling process.
    pub pid: i32,
    /// The call as printed by the tracer.
    pub call: String,
}

impl Strace {
    /// Creates a new trace entry.
    pub fn new(pid: i32, call: impl Into<String>) -> Self {
        Self {
            pid,
            call: call.into(),
        }
    }
}

/// One row of an open-files (`lsof`) snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lsof {
    /// Command name.
    pub command: String,
    /// Owning process.
    pub pid: i32,
    /// Owning user.
    pub user: String,
    /// File descriptor column.
    pub fd: String,
    /// File type column.
    #[serde(rename = "type")]
    pub kind: String,
    /// Device numbers.
    pub device: String,
    /// Size or offset column.
    pub size: String,
    /// Inode number.
    pub node: String,
    /// File name.
    pub name: String,
}

impl Lsof {
    /// Starts building a snapshot row.
    pub fn builder() -> LsofBuilder {
        LsofBuilder::default()
    }
}

/// Builder for [`Lsof`] rows.
#[derive(Debug, Clone, Default)]
pub struct LsofBuilder {
    row: Lsof,
}

impl LsofBuilder {
    /// Sets the command name.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.row.command = command.into();
        self
    }

    /// Sets the process id.
    pub fn pid(mut self, pid: i32) -> Self {
        self.row.pid = pid;
        self
    }

    /// Sets the user.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.row.user = user.into();
        self
    }

    /// Sets the file descriptor column.
    pub fn fd(mut self, fd: impl Into<String>) -> Self {
        self.row.fd = fd.into();
        self
    }

    /// Sets the file type column.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.row.kind = kind.into();
        self
    }

    /// Sets the device column.
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.row.device = device.into();
        self
    }

    /// Sets the size/offset column.
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.row.size = size.into();
        self
    }

    /// Sets the inode column.
    pub fn node(mut self, node: impl Into<String>) -> Self {
        self.row.node = node.into();
        self
    }

    /// Sets the file name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.row.name = name.into();
        self
    }

    /// Finishes the row.
    pub fn build(self) -> Lsof {
        self.row
    }
}
