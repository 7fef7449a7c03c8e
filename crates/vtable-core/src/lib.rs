//! Virtual viewport engine core: a chunked data cache, a threshold-locked
//! scroll viewport state machine, a message/command update loop, and a
//! component-based row composer — the shared machinery behind terminal
//! list, tree, and table widgets that virtualize over datasets too large
//! (or too slow) to hold in memory all at once.
//!
//! The crate owns no I/O, no rendering surface, and no background threads
//! (§1, §5). A host feeds it [`Message`]s, drains [`data_source::Command`]s,
//! executes them against its own [`data_source::DataSource`], and feeds the
//! results back in as further messages.

pub mod bounding;
pub mod chunk;
pub mod data_source;
pub mod error;
pub mod item;
pub mod list;
pub mod message;
pub mod row;
pub mod style;
pub mod table;
pub mod tree;
pub mod viewport;

pub use chunk::{Chunk, ChunkStore};
pub use data_source::{Command, DataRequest, DataSource, FilterDescriptor, SortDirection, VecDataSource};
pub use error::ControllerError;
pub use item::Item;
pub use list::{ChunkEvent, ListController};
pub use message::{Key, Message};
pub use row::{ComponentKind, RowComponent, RowComposer, RowContext, RowFragments};
pub use style::{Glyphs, Theme};
pub use table::{HorizontalScrollMode, HorizontalScrollScope, TableColumn, TableController};
pub use tree::{FlatTreeItem, TreeController, TreeNode};
pub use viewport::{ViewportConfig, ViewportState};
