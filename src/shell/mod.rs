use std::io::{self, Write};
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

mod executor;

pub use executor::LineExecutor;

use crate::{
    core::{commands::Flow, config::ShellConfig, state::ShellState},
    error::ShellError,
    flags::Flags,
    highlight::Diagnostics,
    process::{signal, ModeController},
};

pub struct Shell {
    pub(crate) editor: DefaultEditor,
    pub(crate) config: ShellConfig,
    pub(crate) state: Arc<ShellState>,
    pub(crate) executor: LineExecutor,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) mode_controller: Option<ModeController>,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let config = ShellConfig::load(&flags)?;
        let editor = DefaultEditor::new()?;
        let state = Arc::new(ShellState::new());

        signal::ignore_interrupts()?;
        let mode_controller = ModeController::spawn(Arc::clone(&state), config.prompt.clone())?;

        let executor = LineExecutor::new(Arc::clone(&state), &config);
        let diagnostics = Diagnostics::new(flags.is_set("quiet"));
        log::debug!("smallsh started as pid {}", std::process::id());

        Ok(Shell {
            editor,
            config,
            state,
            executor,
            diagnostics,
            mode_controller: Some(mode_controller),
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        let result = self.read_loop();
        if let Some(controller) = self.mode_controller.take() {
            controller.shutdown();
        }
        result
    }

    fn read_loop(&mut self) -> Result<(), ShellError> {
        let stdout = io::stdout();

        loop {
            self.state.set_at_prompt(true);
            let input = self.editor.readline(&self.config.prompt);
            self.state.set_at_prompt(false);

            let mut out = stdout.lock();
            let flow = handle_input(&mut self.executor, &self.diagnostics, input, &mut out)?;
            if flow == Flow::Exit {
                break;
            }
        }
        Ok(())
    }
}

/// One loop iteration. Background children are reaped whatever the input was.
fn handle_input<W: Write>(
    executor: &mut LineExecutor,
    diagnostics: &Diagnostics,
    input: Result<String, ReadlineError>,
    out: &mut W,
) -> Result<Flow, ShellError> {
    let flow = match input {
        Ok(line) => match executor.execute_line(&line, out) {
            Ok(flow) => flow,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                diagnostics.error(&format!("smallsh: {}", e));
                Flow::Continue
            }
        },
        Err(ReadlineError::Interrupted) => {
            diagnostics.hint("Use 'exit' to exit the shell");
            Flow::Continue
        }
        Err(ReadlineError::Eof) => Flow::Exit,
        Err(e) => {
            log::warn!("readline failed: {}", e);
            Flow::Continue
        }
    };

    executor.reap(out)?;
    out.flush()?;
    Ok(flow)
}
