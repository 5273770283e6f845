pub mod certgen;
pub mod config;
pub mod platform;
pub mod process;  // 명시적 argv + 종료 코드 전파
pub mod python_env;
pub mod server;
