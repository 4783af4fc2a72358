pub mod mode;
pub mod record;

// Re-export commonly used types
pub use mode::Mode;
pub use record::{
    Actor, Book, Cell, CellReference, Dialogue, DialogueType, Enchantment, Info, InventoryEntry,
    LevelledEntry, LevelledList, Object, PathGrid, QuestState, Record, RecordKind, Script,
    StartScript,
};
