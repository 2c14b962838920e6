//! Execution context threaded through the resolver and strategies, in place
//! of ambient process state.

use crate::channel::InstallChannel;
use crate::exec::CommandRunner;
use crate::fetch::Fetcher;
use crate::host::HostProfile;
use crate::workspace::ScratchWorkspace;

pub struct ExecutionContext<'a> {
    pub host: &'a HostProfile,
    pub channel: InstallChannel,
    pub workspace: &'a ScratchWorkspace,
    pub fetcher: &'a dyn Fetcher,
    pub runner: &'a dyn CommandRunner,
}
