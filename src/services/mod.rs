//! External collaborators: the feed and the download clients.

pub mod client;
pub mod feed;
pub mod sabnzbd;
pub mod transmission;
