mod app;

use std::process::exit;

use app::{
    options::{from_command_line, Options},
    runtime::State,
};

fn main() {
    // Get options from the command line
    let args = from_command_line();
    let options = match Options::from_args(&args) {
        Ok(options) => options,
        Err(why) => {
            eprintln!("{why}");
            exit(1);
        }
    };

    // Create app state and run the conversion
    let app = State::new(options);
    if let Err(why) = app.run() {
        eprintln!("{why}");
        exit(1);
    }
}
