use super::parsers::{parse_duration_arg, parse_header_name, parse_think_seconds};
use super::test_support::parse_test_args;
use super::*;
use crate::error::{AppError, AppResult};
use std::path::Path;
use std::time::Duration;
