// api/command.rs - 控制台命令解析器
//! 解析简写命令或 JSON 编辑请求
//!
//! 支持的语法:
//! - 追加条件: `add-clause [group]`（缺省为 root）
//! - 删除子节点: `rm-clause <group> <index>`
//! - 追加分组: `add-group [parent]`
//! - 删除分组: `rm-group <group>`
//! - 设置字段: `field <clause> [key]`（省略 key 表示取消选择）
//! - 设置操作符: `op <clause> [operator]`，操作符可含空格，如 `does not contain`
//! - 设置值: `value <clause> [value]`，支持 `"text"`、数字、`true/false`、`[a, b]`
//! - 切换逻辑: `logic <group> and|or`
//! - 清空: `clear`
//! - 导出: `print` / `export`
//! - JSON: 以 `{` 开头的行按 [`EditRequest`] 解析

use once_cell::sync::Lazy;
use regex::Regex;

use super::request::{EditRequest, NodeRef};
use crate::query::{ClauseValue, Logic};

/// 命令解析错误
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument <{argument}> for '{command}'")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },

    #[error("Invalid argument for '{command}': {message}")]
    InvalidArgument { command: String, message: String },

    #[error("Invalid JSON request: {0}")]
    Json(#[from] serde_json::Error),
}

// 正则表达式预编译
static COMMAND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // 命令名 + 剩余参数
    Regex::new(r"^([a-z][a-z\-]*)(?:\s+(.*))?$").unwrap()
});

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap()
});

static LIST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(.*)\]$").unwrap()
});

/// 解析一行输入
pub fn parse_command(input: &str) -> Result<EditRequest, CommandError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CommandError::Empty);
    }
    if input.starts_with('{') {
        return Ok(serde_json::from_str(input)?);
    }

    let cap = COMMAND_PATTERN
        .captures(input)
        .ok_or_else(|| CommandError::UnknownCommand(input.to_string()))?;
    let command = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
    let rest = cap.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
    let mut args = Args::new(command, rest);

    let request = match command {
        "add-clause" => EditRequest::AddClause {
            group: args.optional_node()?,
        },
        "rm-clause" | "remove-clause" => EditRequest::RemoveClauseAt {
            group: args.node("group")?,
            index: args.index()?,
        },
        "add-group" => EditRequest::AddGroup {
            parent: args.optional_node()?,
        },
        "rm-group" | "remove-group" => EditRequest::RemoveGroup {
            group: args.node("group")?,
        },
        "field" => EditRequest::SetField {
            clause: args.node("clause")?,
            field: args.remainder(),
        },
        "op" | "operator" => EditRequest::SetOperator {
            clause: args.node("clause")?,
            operator: args.remainder(),
        },
        "value" => EditRequest::SetValue {
            clause: args.node("clause")?,
            value: args.remainder().map(|raw| parse_value(&raw)).unwrap_or_default(),
        },
        "logic" => EditRequest::SetLogic {
            group: args.node("group")?,
            logic: args.logic()?,
        },
        "clear" => EditRequest::Clear,
        "print" | "export" => EditRequest::Export,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };
    Ok(request)
}

/// 解析值字面量
pub fn parse_value(raw: &str) -> ClauseValue {
    let raw = raw.trim();

    // 带引号的文本原样保留
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return ClauseValue::Text(raw[1..raw.len() - 1].to_string());
    }

    match raw {
        "true" => return ClauseValue::Boolean(true),
        "false" => return ClauseValue::Boolean(false),
        _ => {}
    }

    if NUMBER_PATTERN.is_match(raw) {
        if let Ok(number) = raw.parse::<f64>() {
            return ClauseValue::Number(number);
        }
    }

    if let Some(cap) = LIST_PATTERN.captures(raw) {
        let items = cap
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .split(',')
            .map(|item| item.trim().trim_matches('"').to_string())
            .filter(|item| !item.is_empty())
            .collect();
        return ClauseValue::List(items);
    }

    ClauseValue::Text(raw.to_string())
}

/// 逐个消费参数
struct Args<'a> {
    command: &'a str,
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn new(command: &'a str, rest: &'a str) -> Self {
        Self { command, rest }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        self.rest = tail;
        Some(token)
    }

    fn invalid(&self, message: impl Into<String>) -> CommandError {
        CommandError::InvalidArgument {
            command: self.command.to_string(),
            message: message.into(),
        }
    }

    fn missing(&self, argument: &'static str) -> CommandError {
        CommandError::MissingArgument {
            command: self.command.to_string(),
            argument,
        }
    }

    fn parse_node(&self, token: &str) -> Result<NodeRef, CommandError> {
        token.parse().map_err(|e| self.invalid(format!("{}", e)))
    }

    fn node(&mut self, argument: &'static str) -> Result<NodeRef, CommandError> {
        let token = self.next_token().ok_or_else(|| self.missing(argument))?;
        self.parse_node(token)
    }

    fn optional_node(&mut self) -> Result<NodeRef, CommandError> {
        match self.next_token() {
            Some(token) => self.parse_node(token),
            None => Ok(NodeRef::Root),
        }
    }

    fn index(&mut self) -> Result<usize, CommandError> {
        let token = self.next_token().ok_or_else(|| self.missing("index"))?;
        token
            .parse()
            .map_err(|_| self.invalid(format!("'{}' is not an index", token)))
    }

    fn logic(&mut self) -> Result<Logic, CommandError> {
        let token = self.next_token().ok_or_else(|| self.missing("logic"))?;
        token.parse().map_err(|e: String| self.invalid(e))
    }

    /// 剩余全部文本，空则为 None
    fn remainder(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.rest).trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}
