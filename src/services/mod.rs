pub mod m3u_parser;
pub mod provider_client;
pub mod stb;
pub mod url_builder;
pub mod xtream;
