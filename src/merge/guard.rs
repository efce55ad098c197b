//! Checks that stop a merge before votes are counted

use crate::policy::Policy;

/// Whether the change touches the policy document at `policy_path`
pub fn edits_policy<S: AsRef<str>>(changed_files: &[S], policy_path: &str) -> bool {
    changed_files.iter().any(|file| file.as_ref() == policy_path)
}

/// The first blocking keyword found in `title`, if any
///
/// Matching is a case-sensitive substring search.
pub fn blocking_keyword<'a>(policy: &'a Policy, title: &str) -> Option<&'a str> {
    policy
        .resolved_block_keywords()
        .into_iter()
        .find(|keyword| title.contains(*keyword))
}
