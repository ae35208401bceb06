// Job-market dashboard: fixed datasets behind mock feeds with artificial
// latency, each loaded through its own operation.

pub mod data;
pub mod feed;
pub mod handlers;
