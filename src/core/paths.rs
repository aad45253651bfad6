//! # Path Resolution Module / 路径解析模块
//!
//! Turns user-supplied path strings into absolute locations:
//!
//! 1. A `${WORKSPACE}` placeholder (any case, also `$WORKSPACE` and `%WORKSPACE%`)
//!    and everything before it are replaced by the job workspace root.
//! 2. Absolute paths (`C:\...` or a leading separator) are returned unchanged.
//! 3. An empty string resolves to the workspace root itself.
//! 4. Anything else is relative to the workspace root.
//!
//! `$NAME` references are expanded from the process environment before the
//! absolute/relative decision, so `$ITEST_HOME/ws` stays absolute when the
//! variable is. Unknown names stay as written.
//!
//! 将用户提供的路径字符串转换为绝对位置：占位符及其之前的内容替换为作业工作区根目录；
//! 绝对路径原样返回；空字符串解析为工作区根目录；其他内容视为相对于工作区根目录。
//! `$NAME` 引用在判断绝对/相对路径之前从进程环境中展开，未知名称保持原样。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::PipelineError;

/// URI scheme iTest uses for test cases inside exported projects.
pub const PROJECT_SCHEME: &str = "project://";

static WORKSPACE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$\{workspace\}|%workspace%|\$workspace\b").expect("placeholder pattern is valid")
});

static ABSOLUTE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z]:[\\/]|[\\/])").expect("absolute path pattern is valid"));

/// Byte range of the first workspace placeholder in `value`, if any.
pub fn find_workspace_placeholder(value: &str) -> Option<(usize, usize)> {
    WORKSPACE_PLACEHOLDER.find(value).map(|m| (m.start(), m.end()))
}

/// `true` for Windows drive paths (`C:\`) and paths with a leading separator.
pub fn is_absolute(value: &str) -> bool {
    ABSOLUTE_PATH.is_match(value)
}

/// Resolves path strings against one job workspace root.
///
/// 针对一个作业工作区根目录解析路径字符串。
#[derive(Debug, Clone)]
pub struct PathResolver {
    base: String,
}

impl PathResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Resolves `raw` to an absolute path string.
    ///
    /// The remainder after a placeholder is appended exactly as written, so
    /// `${WORKSPACE}/suite` becomes `<base>/suite`.
    pub fn resolve(&self, raw: &str) -> String {
        if let Some((_, end)) = find_workspace_placeholder(raw) {
            return format!("{}{}", self.base, &raw[end..]);
        }
        if is_absolute(raw) {
            return raw.to_string();
        }
        if raw.is_empty() {
            return self.base.clone();
        }
        self.join(raw)
    }

    /// Resolves `raw` with `$NAME` references expanded from the process environment.
    pub fn resolve_expanded(&self, raw: &str) -> String {
        self.resolve_expanded_with(raw, |name| std::env::var(name).ok())
    }

    /// Like [`resolve_expanded`](Self::resolve_expanded), looking names up with `lookup`.
    ///
    /// A workspace placeholder is matched before expansion so `$WORKSPACE`
    /// always maps to the job root. Everything else is expanded first and then
    /// resolved.
    pub fn resolve_expanded_with<F>(&self, raw: &str, lookup: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        if find_workspace_placeholder(raw).is_some() {
            return expand_env_with(&self.resolve(raw), lookup);
        }
        self.resolve(&expand_env_with(raw, lookup))
    }

    fn join(&self, relative: &str) -> String {
        if self.base.ends_with(['/', '\\']) {
            return format!("{}{}", self.base, relative);
        }
        let separator = if self.base.contains('\\') && !self.base.contains('/') {
            '\\'
        } else {
            '/'
        };
        format!("{}{}{}", self.base, separator, relative)
    }
}

/// Expands `$NAME` and `${NAME}` using `lookup`. Names it does not know are
/// left in place.
pub fn expand_env_with<F>(input: &str, lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    shellexpand::env_with_context_no_errors(input, lookup).into_owned()
}

/// Converts one test-case entry to the URI passed to `--test`.
///
/// Entries without a placeholder are used verbatim. An entry that starts with
/// the workspace placeholder is rewritten to `project://<remainder>`, dropping
/// one leading separator from the remainder. A placeholder anywhere else is
/// rejected.
pub fn test_case_uri(entry: &str) -> Result<String, PipelineError> {
    let Some((start, end)) = find_workspace_placeholder(entry) else {
        return Ok(entry.to_string());
    };
    if start != 0 {
        return Err(PipelineError::Configuration(format!(
            "test case '{}' must start with the workspace placeholder when it uses one",
            entry
        )));
    }
    let remainder = &entry[end..];
    let remainder = remainder
        .strip_prefix('/')
        .or_else(|| remainder.strip_prefix('\\'))
        .unwrap_or(remainder);
    if remainder.is_empty() {
        return Err(PipelineError::Configuration(format!(
            "test case '{}' does not name a file after the workspace placeholder",
            entry
        )));
    }
    Ok(format!("{}{}", PROJECT_SCHEME, remainder))
}
