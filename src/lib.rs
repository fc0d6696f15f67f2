// Library root
// ------------
// The binary (`main.rs`) parses flags and hands them to `dispatch`, which
// runs one of two workflows against the video platform:
// - `upload`: resumable, chunked video upload with progress reporting.
// - `comments`: paginated comment fetch and keyword-filtered deletion.
//
// `api` is the real HTTP client; the workflows only see the
// `platform::VideoPlatform` trait so they can run against a fake in tests.
pub mod api;
pub mod cli;
pub mod comments;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod platform;
pub mod ui;
pub mod upload;

#[cfg(test)]
mod testing;
