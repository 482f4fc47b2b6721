mod client_ip;

pub use client_ip::{ClientIp, FORWARDED_FOR_HEADER};
