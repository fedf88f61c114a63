pub mod assign;
pub mod cats;
pub mod edit;
pub mod export;
pub mod init;
pub mod ls;
pub mod root;
pub mod stats;
pub mod status;
pub mod upload;
