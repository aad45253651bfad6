//! Subcommands of the `itest-runner` binary.
//!
//! `itest-runner` 二进制程序的子命令。

pub mod check;
pub mod configure;
pub mod init;
pub mod run;
