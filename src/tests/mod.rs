mod config;
mod events;
mod filter;
mod registers;
mod timing;
