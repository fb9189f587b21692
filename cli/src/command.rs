//! Commands typed at the `quickbill>` prompt.

use std::str::FromStr;

use quickbill_core::{BillId, Field};

pub const HELP: &str = "\
Commands:
  set <field> <value>   fill a form field (customer, date, amount, tax, discount)
  add                   submit the form as a new bill
  search [term]         filter by customer (uses the last term when omitted)
  reset                 clear the search and reload every bill
  sort                  sort by date, alternating direction
  delete <id>           delete a bill after confirmation
  reload                fetch the bill list again
  show                  redraw the screen
  help                  show this text
  quit                  leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Add,
    Search(Option<String>),
    Reset,
    Sort,
    Delete(BillId),
    Reload,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Ok(Command::Set(field.parse()?, value.to_string()))
            }
            "add" => Ok(Command::Add),
            "search" => Ok(Command::Search(
                (!rest.is_empty()).then(|| rest.to_string()),
            )),
            "reset" => Ok(Command::Reset),
            "sort" => Ok(Command::Sort),
            "delete" | "rm" => {
                if rest.is_empty() {
                    return Err("usage: delete <id>".to_string());
                }
                Ok(Command::Delete(BillId::from(rest)))
            }
            "reload" | "list" => Ok(Command::Reload),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command {other:?}, try `help`")),
        }
    }
}
