pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod logger;
pub mod parser;
pub mod presenter;
pub mod serializer;
pub mod shell;
pub mod storage;
pub mod task;
pub mod task_list;
