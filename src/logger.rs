// logger.rs - 日志初始化
use env_logger::Env;

/// 初始化日志；`RUST_LOG` 优先，否则按 verbose 选择 debug / info
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    // 重复初始化（例如测试中）直接忽略
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}
