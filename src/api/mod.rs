pub mod advent_of_code_api;
pub mod advent_of_code_links;
pub mod http_client;
