use crate::{
    api::HttpClient, config::Config, controller::Controller, transcript::Transcript, Args,
};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;
use std::io::{self, Write};

pub struct Context {
    pub args: Args,
    pub transcript: RefCell<Transcript>,
    pub session_id: String,
    pub config: RefCell<Config>,
    pub controller: RefCell<Controller<HttpClient>>,
}

pub fn run_once(ctx: &Context, line: &str) -> Result<()> {
    handle_command(ctx, line, None)?;
    Ok(())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("userctl - type help for commands, exit to quit");

    // Load and print the table before the first prompt
    {
        let mut ctl = ctx.controller.borrow_mut();
        let mut tx = ctx.transcript.borrow_mut();
        ctl.load_users(&mut tx);
        print!("{}", ctl.view());
    }

    loop {
        match rl.readline("users> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match handle_command(&ctx, line, Some(&mut rl)) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => eprintln!("Input error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Dispatch one command line. Returns true when the session should end.
fn handle_command(ctx: &Context, line: &str, rl: Option<&mut DefaultEditor>) -> Result<bool> {
    ctx.transcript.borrow_mut().command(line).ok();

    let parts = match shell_words::split(line) {
        Ok(parts) => parts,
        Err(e) => {
            println!("Parse error: {}", e);
            return Ok(false);
        }
    };
    let Some(cmd) = parts.first() else {
        return Ok(false);
    };

    match cmd.as_str() {
        "exit" | "quit" => return Ok(true),
        "help" => {
            println!("Commands:");
            println!("  list                        - reload and print the user table");
            println!("  add [name email age]        - create a user (prompts for missing fields)");
            println!("  edit <id> [name email age]  - update a user (empty input keeps a value)");
            println!("  delete <id>                 - delete a user after confirmation");
            println!("  reset                       - clear the form, back to create mode");
            println!("  form                        - show the current form fields");
            println!("  session                     - show session info");
            println!("  exit                        - quit");
        }
        "list" | "ls" => {
            let mut ctl = ctx.controller.borrow_mut();
            let mut tx = ctx.transcript.borrow_mut();
            ctl.load_users(&mut tx);
            print!("{}", ctl.view());
        }
        "add" => {
            let inline = &parts[1..];
            if rl.is_none() && inline.len() < 3 {
                println!("Usage in -c mode: add <name> <email> <age>");
                return Ok(false);
            }
            ctx.controller.borrow_mut().reset_form();
            fill_form(ctx, inline, rl)?;
            submit_and_show(ctx);
        }
        "edit" => {
            let Some(id) = parse_id(parts.get(1)) else {
                println!("Usage: edit <id> [name email age]");
                return Ok(false);
            };
            {
                let mut ctl = ctx.controller.borrow_mut();
                let mut tx = ctx.transcript.borrow_mut();
                ctl.edit_user(id, &mut tx);
                if ctl.form().record_id() != Some(id) {
                    // Fetch failed; the error is already in the transcript
                    return Ok(false);
                }
            }
            print_form(ctx);
            fill_form(ctx, &parts[2..], rl)?;
            submit_and_show(ctx);
        }
        "delete" | "rm" => {
            let Some(id) = parse_id(parts.get(1)) else {
                println!("Usage: delete <id>");
                return Ok(false);
            };
            let auto_yes = ctx.args.yes;
            let one_shot = rl.is_none();
            let mut ctl = ctx.controller.borrow_mut();
            let mut tx = ctx.transcript.borrow_mut();
            ctl.delete_user(
                id,
                || {
                    if auto_yes {
                        return true;
                    }
                    if one_shot {
                        eprintln!("Delete declined: use --yes in -c mode");
                        return false;
                    }
                    prompt_confirm(&format!("Delete user {}? [y/N]: ", id))
                },
                &mut tx,
            );
            print!("{}", ctl.view());
        }
        "reset" => {
            let mut ctl = ctx.controller.borrow_mut();
            ctl.reset_form();
            println!("Form reset ({} mode)", ctl.form().submit_label());
        }
        "form" => {
            print_form(ctx);
        }
        "session" => {
            println!("Session: {}", ctx.session_id);
            println!("Transcript: {:?}", ctx.transcript.borrow().path);
            println!("Endpoint: {}", ctx.config.borrow().endpoint.base_url);
        }
        _ => println!("Unknown command: {}", cmd),
    }
    Ok(false)
}

fn parse_id(arg: Option<&String>) -> Option<u64> {
    arg.and_then(|s| s.parse().ok())
}

/// Fill the form fields from inline values, prompting for the rest.
///
/// Inline values take the fields in order: name, email, age. At the prompt,
/// an empty answer keeps the current field value, so a populated form shows
/// through as defaults during edit.
fn fill_form(ctx: &Context, inline: &[String], rl: Option<&mut DefaultEditor>) -> Result<()> {
    const FIELDS: [&str; 3] = ["name", "email", "age"];

    let current = {
        let ctl = ctx.controller.borrow();
        let form = ctl.form();
        [form.name.clone(), form.email.clone(), form.age.clone()]
    };

    let mut filled = current.clone();
    for (i, value) in inline.iter().take(FIELDS.len()).enumerate() {
        filled[i] = value.clone();
    }

    if let Some(rl) = rl {
        for i in inline.len()..FIELDS.len() {
            let prompt = if current[i].is_empty() {
                format!("{}: ", FIELDS[i])
            } else {
                format!("{} [{}]: ", FIELDS[i], current[i])
            };
            let answer = rl.readline(&prompt)?;
            let answer = answer.trim();
            if !answer.is_empty() {
                filled[i] = answer.to_string();
            }
        }
    }

    let mut ctl = ctx.controller.borrow_mut();
    let form = ctl.form_mut();
    let [name, email, age] = filled;
    form.name = name;
    form.email = email;
    form.age = age;
    Ok(())
}

fn submit_and_show(ctx: &Context) {
    let mut ctl = ctx.controller.borrow_mut();
    let mut tx = ctx.transcript.borrow_mut();
    ctl.submit_form(&mut tx);
    print!("{}", ctl.view());
}

fn print_form(ctx: &Context) {
    let ctl = ctx.controller.borrow();
    let form = ctl.form();
    match form.record_id() {
        Some(id) => println!("Editing user {}", id),
        None => println!("New user"),
    }
    println!("  name:  {}", form.name);
    println!("  email: {}", form.email);
    println!("  age:   {}", form.age);
    println!("  [{}]", form.submit_label());
}

/// Interactive yes/no prompt on stdin
fn prompt_confirm(question: &str) -> bool {
    print!("{}", question);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        let input = input.trim().to_lowercase();
        input == "y" || input == "yes"
    } else {
        false
    }
}
