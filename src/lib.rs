//! Simulation core of a turn-based dungeon crawler.
//!
//! The crate owns the rules and nothing else: maze floors generated on
//! first visit and cached per depth, a phased battle machine, a guild
//! quest log, town services, and an inventory menu. Input arrives as one
//! [`Intent`] per [`step`]; output leaves as a serializable
//! [`RenderModel`] snapshot. Rendering, input mapping and the main loop
//! are the embedding application's problem.
//!
//! ```
//! use wizcrawl::{render_model, step, Intent, Session};
//!
//! let mut session = Session::new(7);
//! step(&mut session, Some(Intent::Confirm)); // rest at the inn
//! let frame = render_model(&session);
//! assert_eq!(frame.player.hp, frame.player.max_hp);
//! ```

pub mod combat;
pub mod floor;
pub mod intent;
pub mod logic;
pub mod maze;
pub mod quest;
pub mod state;
pub mod view;

pub use intent::{Intent, SelectDir};
pub use logic::step;
pub use state::Session;
pub use view::{render_model, RenderModel};
