//! Commands every shell starts with.

use core::fmt::Write;

use super::command::Command;
use super::context::Context;
use crate::terminal::QuitResult;

/// Built-in command table, registered by [`Shell::new`](crate::Shell::new).
pub static COMMANDS: [Command; 2] = [
    Command::new("help", "Show help information.", "help [command]", help),
    Command::new("exit", "Leave the host main loop.", "exit", exit),
];

fn help(ctx: &mut dyn Context, args: &[&str]) {
    match args {
        [_] => {
            let count = ctx.commands().len();
            for index in 0..count {
                let Some(&command) = ctx.commands().get(index) else {
                    break;
                };
                let _ = write!(
                    ctx,
                    "{:>16}:\t\t\t{}\r\n",
                    command.name, command.description
                );
            }
        }
        [_, name] => match ctx.find_command(name) {
            Some(command) => {
                let _ = write!(
                    ctx,
                    "{}:\t{}\r\n\t{}\r\n",
                    command.name, command.description, command.usage
                );
            }
            None => {
                let _ = write!(ctx, "Command {} not found.\r\n", name);
            }
        },
        _ => {
            let _ = ctx.write_str("Parameter too many.\r\n");
        }
    }
    ctx.finish();
}

fn exit(ctx: &mut dyn Context, _args: &[&str]) {
    if ctx.request_quit() == QuitResult::Rejected {
        let _ = ctx.write_str("exit: rejected by host\r\n");
    }
    ctx.finish();
}
