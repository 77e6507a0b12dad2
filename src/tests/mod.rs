pub mod common;

#[cfg(test)]
mod upstream_retry;
