//! Shared test harness modules for the Reparto CLI.

use super::*;

mod helpers;
