// Logging front end for the interpreter. With the `log` feature the macros
// forward to `log`; unit tests print instead so output shows up under
// `cargo test -- --nocapture`. Without the feature the arguments are only
// borrowed, which keeps variables used solely for logging warning-free.

#[cfg(all(feature = "log", not(test)))]
macro_rules! forth_log {
    ($level:ident, $($arg:expr),*) => {
        log::log!(log::Level::$level, $($arg),*)
    };
}

#[cfg(all(feature = "log", test))]
macro_rules! forth_log {
    ($level:ident, $($arg:expr),*) => {{
        print!("[{}] ", stringify!($level));
        println!($($arg),*);
    }};
}

#[cfg(not(feature = "log"))]
macro_rules! forth_log {
    ($level:ident, $($arg:expr),*) => {{ $( let _ = &$arg; )* }};
}

macro_rules! forth_trace {
    ($($arg:expr),*) => (forth_log!(Trace, $($arg),*));
}

macro_rules! forth_debug {
    ($($arg:expr),*) => (forth_log!(Debug, $($arg),*));
}

macro_rules! forth_info {
    ($($arg:expr),*) => (forth_log!(Info, $($arg),*));
}
