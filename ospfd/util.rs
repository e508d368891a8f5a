use std::net::Ipv4Addr;

/// Bails out of the current function (or runs the given control flow) when
/// the condition does not hold.
#[macro_export]
macro_rules! must {
    ($cond:expr; ret: $ret:expr) => {
        if !($cond) {
            return $ret;
        }
    };
    ($cond:expr; warning: $($arg:tt)*) => {
        if !($cond) {
            $crate::log_warning!($($arg)*);
            return;
        }
    };
    ($cond:expr; debug: $($arg:tt)*) => {
        if !($cond) {
            $crate::log!($($arg)*);
            return;
        }
    };
    ($cond:expr; $action:tt) => {
        if !($cond) {
            $action;
        }
    };
    ($cond:expr) => {
        if !($cond) {
            return;
        }
    };
}

/// `let ... else return` with optional logging.
#[macro_export]
macro_rules! guard {
    ($pat:pat = $expr:expr; ret: $ret:expr) => {
        let $pat = $expr else {
            return $ret;
        };
    };
    ($pat:pat = $expr:expr; warning: $($arg:tt)*) => {
        let $pat = $expr else {
            $crate::log_warning!($($arg)*);
            return;
        };
    };
    ($pat:pat = $expr:expr; debug: $($arg:tt)*) => {
        let $pat = $expr else {
            $crate::log!($($arg)*);
            return;
        };
    };
    ($pat:pat = $expr:expr) => {
        let $pat = $expr else {
            return;
        };
    };
}

pub const fn hex2ip(hex: u32) -> Ipv4Addr {
    let bytes = hex.to_be_bytes();
    Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
}

pub const fn prefix2mask(len: u8) -> Ipv4Addr {
    if len == 0 {
        return Ipv4Addr::UNSPECIFIED;
    }
    let len = if len > 32 { 32 } else { len };
    hex2ip(u32::MAX << (32 - len))
}
