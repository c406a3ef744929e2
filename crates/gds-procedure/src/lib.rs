//! gds-procedure - interpreter for guided diagnostic procedures
//!
//! A [`ProcedureRun`] walks the steps of one [`gds_core::Procedure`],
//! asking the operator for keystring choices and the ECU (through a
//! [`gds_core::BusTransport`]) for response data, and records every step it
//! visits as a [`StepVisit`].
//!
//! ```
//! use gds_core::{CommunicationSetup, MockTransport, Procedure, ProcedureStep, Protocol};
//! use gds_procedure::{ProcedureRun, RunOptions, RunState, ScriptedSelector};
//!
//! let procedure = Procedure {
//!     index: Some(1),
//!     name: "Lamp check".to_string(),
//!     description: String::new(),
//!     steps: vec![ProcedureStep {
//!         step_no: 1,
//!         description: "Observe the warning lamp".to_string(),
//!         message_index: 0,
//!         message: None,
//!         keystrings: Vec::new(),
//!         rules: Vec::new(),
//!     }],
//! };
//! let comm = CommunicationSetup {
//!     tx_id: Some(0x7E0),
//!     rx_id: 0x7E8,
//!     vss_channel: None,
//!     protocol: Protocol::Can,
//!     supported_functions: Vec::new(),
//!     start_requests: Vec::new(),
//! };
//!
//! let transport = MockTransport::new();
//! let mut run = ProcedureRun::new(&procedure, &comm, &transport, RunOptions::default());
//! let state = run.run_to_end(&mut ScriptedSelector::default()).unwrap();
//! assert_eq!(state, RunState::Completed);
//! assert_eq!(run.trace().len(), 1);
//! ```

mod config;
pub mod error;
mod run;
mod selection;
mod state;

pub use config::RunOptions;
pub use error::{InterpreterError, InterpreterResult};
pub use run::{ProcedureRun, RunOutcome};
pub use selection::{validate_selection, KeystringSelector, ScriptedSelector};
pub use state::{AbortReason, RunState, StepVisit};
