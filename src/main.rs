// main.rs
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use log::info;

use query_builder::config::CONFIG;
use query_builder::logger;
use query_builder::QueryBuilder;

fn main() -> Result<()> {
    let verbose = std::env::args().skip(1).any(|arg| arg == "-v" || arg == "--verbose");
    logger::init_logger(verbose);

    let config = Arc::new(CONFIG.clone());
    let mut builder = QueryBuilder::builder().with_config(config.clone()).build()?;
    info!("[Catalog] {} fields available", builder.catalog().len());

    println!("--- 查询构建器 ---");
    println!(" 根分组: {}", builder.root_id());
    println!(" 输入命令或 JSON 请求 (输入 'help' 查看命令, 'quit' 退出)");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if input == "quit" || input == "exit" {
            break;
        }
        if input.is_empty() {
            continue;
        }
        if input == "help" {
            print_help();
            continue;
        }
        if input == "fields" {
            for field in builder.catalog().iter() {
                println!(
                    "  {:<14} {:<8} {}",
                    field.key,
                    field.field_type.as_str(),
                    field.operators.join(" | ")
                );
            }
            continue;
        }

        let response = builder.execute(input);
        let output = if config.output.pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        println!("{}", output);
    }

    Ok(())
}

fn print_help() {
    println!("  add-clause [group]          追加条件");
    println!("  rm-clause <group> <index>   删除子节点");
    println!("  add-group [parent]          追加分组");
    println!("  rm-group <group>            删除分组");
    println!("  field <clause> [key]        设置字段");
    println!("  op <clause> [operator]      设置操作符");
    println!("  value <clause> [value]      设置值");
    println!("  logic <group> and|or       设置逻辑");
    println!("  clear                       清空");
    println!("  print                       导出查询文档");
    println!("  fields                      列出字段目录");
}
