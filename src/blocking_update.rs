//! Helper for results of blocking operations with timeout

/// Helper for blocking operations with timeout
///
/// ```rust,no_run
/// # fn main(){
/// # use std::time::Duration;
/// # use ndi_monitor::{find::NDISourceFinderBuilder, sdk::NDIRuntime};
/// # let runtime = NDIRuntime::load("libndi.so.6").unwrap();
/// # let mut finder = NDISourceFinderBuilder::new().build(&runtime).unwrap();
/// let update = finder.wait_for_change(Duration::from_secs(1));
/// if update.value_updated() {
///     println!("Sources: {:?}", finder.current_sources());
/// }
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockingUpdate<T> {
    pub value: T,
    pub(crate) changed: bool,
}

impl<T> BlockingUpdate<T> {
    pub(crate) fn new(value: T, changed: bool) -> Self {
        BlockingUpdate { value, changed }
    }

    /// Indicates that the operation finished within the timeout
    pub fn value_updated(&self) -> bool {
        self.changed
    }
}
