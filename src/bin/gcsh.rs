//! GC shell
//!
//! Interactive driver for the collector: allocate demo objects and strings,
//! link fields, null variables, trigger collections, and inspect the heap
//! dump. Also runs non-interactively over a script file argument.
//!
//! ```text
//! gc> new a
//! a = 0000:Node
//! gc> str n "hello"
//! n = 0048:String
//! gc> set a.name n
//! gc> null n
//! gc> gc
//! collected: 2 -> 2 objects, 0 bytes freed, 0 bytes moved
//! gc> state
//! next_free=86
//! objects:
//!   0000:Node[48]->[48,NULL,NULL]
//!   0048:String[32+6]="hello"
//! ```

use markcompact::{ClassDescriptor, Heap, ObjectHeader, Ref, StringObject};
use regex::Regex;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::BTreeMap;

const DEFAULT_HEAP_SIZE: usize = 4096;

/// Demo object shape: one string field and two links, enough to build
/// lists, trees, and cycles from the shell.
#[allow(dead_code)]
#[repr(C)]
struct Node {
    header: ObjectHeader,
    name: Ref,
    left: Ref,
    right: Ref,
}

static NODE_CLASS: ClassDescriptor = ClassDescriptor {
    name: "Node",
    size: size_of::<Node>(),
    field_offsets: &[
        std::mem::offset_of!(Node, name),
        std::mem::offset_of!(Node, left),
        std::mem::offset_of!(Node, right),
    ],
};

fn node_field_offset(name: &str) -> Option<usize> {
    match name {
        "name" => Some(std::mem::offset_of!(Node, name)),
        "left" => Some(std::mem::offset_of!(Node, left)),
        "right" => Some(std::mem::offset_of!(Node, right)),
        _ => None,
    }
}

/// Shell state: the heap plus named client variables. Each variable is a
/// boxed cell so its address stays stable for root registration.
struct Session {
    heap: Heap,
    vars: BTreeMap<String, Box<Ref>>,
    set_re: Regex,
    str_re: Regex,
}

impl Session {
    fn new(heap_size: usize) -> Session {
        Session {
            heap: Heap::new(heap_size),
            vars: BTreeMap::new(),
            set_re: Regex::new(r"^set\s+([A-Za-z_]\w*)\.([A-Za-z_]\w*)\s+([A-Za-z_]\w*)$")
                .unwrap(),
            str_re: Regex::new(r#"^str\s+([A-Za-z_]\w*)\s+"(.*)"$"#).unwrap(),
        }
    }

    /// Fetch or create the named variable cell, registering new cells as
    /// roots.
    fn var_cell(&mut self, name: &str) -> Result<*mut Ref, String> {
        if !self.vars.contains_key(name) {
            let mut cell = Box::new(Ref::NULL);
            self.heap
                .add_root(&mut *cell)
                .map_err(|e| e.to_string())?;
            self.vars.insert(name.to_string(), cell);
        }
        Ok(&mut **self.vars.get_mut(name).unwrap())
    }

    fn lookup(&self, name: &str) -> Result<Ref, String> {
        self.vars
            .get(name)
            .map(|cell| **cell)
            .ok_or_else(|| format!("unknown variable '{name}'"))
    }

    fn describe(&self, value: Ref) -> String {
        if value.is_null() {
            "NULL".to_string()
        } else {
            let name = unsafe { value.class().name };
            format!("{:04}:{}", self.heap.offset_of(value), name)
        }
    }

    /// Execute one command line. Returns `true` when the session should
    /// end.
    fn exec(&mut self, line: &str) -> Result<bool, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(false);
        }

        if let Some(caps) = self.str_re.captures(line) {
            let (var, text) = (caps[1].to_string(), caps[2].to_string());
            let s = self
                .heap
                .alloc_string(text.len())
                .ok_or("heap exhausted")?;
            unsafe { (*s.cast::<StringObject>()).write(&text) };
            let cell = self.var_cell(&var)?;
            unsafe { *cell = s };
            println!("{} = {}", var, self.describe(s));
            return Ok(false);
        }

        if let Some(caps) = self.set_re.captures(line) {
            let (var, field, value) = (
                caps[1].to_string(),
                caps[2].to_string(),
                caps[3].to_string(),
            );
            let obj = self.lookup(&var)?;
            if obj.is_null() {
                return Err(format!("'{var}' is NULL"));
            }
            let offset =
                node_field_offset(&field).ok_or_else(|| format!("unknown field '{field}'"))?;
            let target = if value == "null" {
                Ref::NULL
            } else {
                self.lookup(&value)?
            };
            unsafe { obj.set_field(offset, target) };
            return Ok(false);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["new", var] => {
                let obj = self.heap.alloc(&NODE_CLASS).ok_or("heap exhausted")?;
                let cell = self.var_cell(var)?;
                unsafe { *cell = obj };
                println!("{} = {}", var, self.describe(obj));
            }
            ["null", var] => {
                let cell = self.var_cell(var)?;
                unsafe { *cell = Ref::NULL };
            }
            ["gc"] => {
                let stats = self.heap.collect();
                println!(
                    "collected: {} -> {} objects, {} bytes freed, {} bytes moved",
                    stats.objects_before,
                    stats.objects_after,
                    stats.bytes_freed,
                    stats.bytes_moved
                );
            }
            ["state"] => print!("{}", self.heap.state()),
            ["roots"] => {
                for (name, cell) in &self.vars {
                    println!("{} -> {}", name, self.describe(**cell));
                }
            }
            ["help"] => print_help(),
            ["quit"] | ["exit"] => return Ok(true),
            _ => return Err(format!("unknown command '{line}' (try 'help')")),
        }
        Ok(false)
    }
}

fn print_help() {
    println!("commands:");
    println!("  new <var>              allocate a Node and root it as <var>");
    println!("  str <var> \"<text>\"     allocate a string and root it as <var>");
    println!("  set <var>.<field> <v>  link a field (name, left, right) to <v> or null");
    println!("  null <var>             clear a variable");
    println!("  gc                     run a collection");
    println!("  state                  print the heap dump");
    println!("  roots                  list variables and their targets");
    println!("  quit                   exit");
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        run_file(&args[1]);
    } else {
        run_repl();
    }
}

fn run_file(filename: &str) {
    let source = match std::fs::read_to_string(filename) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    let mut session = Session::new(DEFAULT_HEAP_SIZE);
    for (lineno, line) in source.lines().enumerate() {
        match session.exec(line) {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => {
                eprintln!("{}:{}: {}", filename, lineno + 1, e);
                std::process::exit(1);
            }
        }
    }
}

fn run_repl() {
    println!("MarkCompact GC shell ({} byte heap)", DEFAULT_HEAP_SIZE);
    println!("Type 'help' for commands, Ctrl+D to exit.\n");

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Error initializing line editor: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = Session::new(DEFAULT_HEAP_SIZE);

    loop {
        match rl.readline("gc> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match session.exec(&line) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => println!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }
}
