/// DOM commands emitted by the renderer update function, executed by the page
/// host. Each mount replaces whatever surface currently exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    MountProcessing { generation: u64, message: String },
    MountStreaming { generation: u64 },
    AppendContent { generation: u64, markup: String },
    MountError { generation: u64, message: String },
    Unmount,
    ScheduleDismiss { generation: u64, timeout: DismissTimeout },
}

/// Which fixed auto-dismiss interval applies to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTimeout {
    /// Processing and streaming surfaces linger long enough to read.
    Reading,
    /// Error surfaces go away sooner.
    Error,
}
