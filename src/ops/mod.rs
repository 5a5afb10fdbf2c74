pub mod deploy;
pub mod remove;
pub mod serverinfo;

/// How running payload instances are matched when stopping them.
///
/// `FileOnly` stops everything with the same file name and can therefore
/// terminate unrelated invocations of the same payload; `FileAndArgs` kills
/// each matching process individually by its recorded invocation arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillMatch {
    FileOnly,
    FileAndArgs,
}
