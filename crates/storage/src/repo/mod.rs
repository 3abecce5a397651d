pub mod pages;
mod votes;
