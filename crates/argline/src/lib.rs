//! Lenient command-line parsing with caller-defined flags and positionals.
//!
//! Tokens are matched in a single pass. Unknown flags are registered on the
//! fly and surplus positionals are kept, so a parse only fails on missing
//! required values or arguments (or an empty argv).
//!
//! ```
//! use argline::{Arg, ArgParser, Flag, Value};
//!
//! let mut parser = ArgParser::from_option_str("program.name=copy").unwrap();
//! parser.def_flag(Flag::new("--verbose", "-v").help("Chatty output"));
//! parser.def_flag(Flag::new("--mode", "-m").with_value(Value::with_default("fast")));
//! parser.def_arg(Arg::new("src").required(true));
//! parser.def_arg(Arg::new("dst").required(true));
//!
//! assert!(parser.parse(&["copy", "-v", "--mode=slow", "a.txt", "b.txt"]));
//! assert!(parser.check("--verbose"));
//! assert_eq!(parser.check_and_read::<String>("-m").as_deref(), Some("slow"));
//! assert_eq!(parser.arg(1).text(), "b.txt");
//!
//! assert!(!parser.parse(&["copy", "a.txt"]));
//! assert_eq!(parser.error(), "error: Required argument missing: <dst>\n");
//! ```

pub mod arg;
pub mod classify;
pub mod error;
pub mod flag;
pub mod help;
pub mod options;
pub mod parser;
pub mod read;
pub mod registry;
pub mod value;

pub use arg::{Arg, SENTINEL_ARG};
pub use classify::{ParamKind, classify, flag_name};
pub use error::{ErrorCode, ErrorLog, ParseError, Subject};
pub use flag::{Flag, SENTINEL_FLAG};
pub use options::{HelpOptions, HelpShow, Options, OptionsError};
pub use parser::{ArgParser, Counts, Tally};
pub use read::{ReadError, read, read_or};
pub use registry::{ArgId, Callback, FlagId, Registry};
pub use value::Value;
