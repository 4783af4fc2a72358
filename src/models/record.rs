use serde::Deserialize;
use std::fmt;

/// One decoded entry of a record file, tagged by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Record {
    Header(Header),
    Cell(Cell),
    PathGrid(PathGrid),
    Dialogue(Dialogue),
    Info(Info),
    Script(Script),
    StartScript(StartScript),
    #[serde(alias = "Enchanting")]
    Enchantment(Enchantment),
    #[serde(alias = "LeveledCreature")]
    LevelledCreature(LevelledList),
    #[serde(alias = "LeveledItem")]
    LevelledItem(LevelledList),
    Container(Actor),
    Creature(Actor),
    Npc(Actor),
    Book(Book),
    Activator(Object),
    Alchemy(Object),
    Apparatus(Object),
    Armor(Object),
    Clothing(Object),
    Door(Object),
    Ingredient(Object),
    Light(Object),
    Lockpick(Object),
    MiscItem(Object),
    Probe(Object),
    #[serde(alias = "RepairTool")]
    RepairItem(Object),
    Static(Object),
    Weapon(Object),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Header,
    Cell,
    PathGrid,
    Dialogue,
    Info,
    Script,
    StartScript,
    Enchantment,
    LevelledCreature,
    LevelledItem,
    Container,
    Creature,
    Npc,
    Book,
    Activator,
    Alchemy,
    Apparatus,
    Armor,
    Clothing,
    Door,
    Ingredient,
    Light,
    Lockpick,
    MiscItem,
    Probe,
    RepairItem,
    Static,
    Weapon,
    Other,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Header => "Header",
            RecordKind::Cell => "Cell",
            RecordKind::PathGrid => "PathGrid",
            RecordKind::Dialogue => "Dialogue",
            RecordKind::Info => "Info",
            RecordKind::Script => "Script",
            RecordKind::StartScript => "StartScript",
            RecordKind::Enchantment => "Enchantment",
            RecordKind::LevelledCreature => "LevelledCreature",
            RecordKind::LevelledItem => "LevelledItem",
            RecordKind::Container => "Container",
            RecordKind::Creature => "Creature",
            RecordKind::Npc => "Npc",
            RecordKind::Book => "Book",
            RecordKind::Activator => "Activator",
            RecordKind::Alchemy => "Alchemy",
            RecordKind::Apparatus => "Apparatus",
            RecordKind::Armor => "Armor",
            RecordKind::Clothing => "Clothing",
            RecordKind::Door => "Door",
            RecordKind::Ingredient => "Ingredient",
            RecordKind::Light => "Light",
            RecordKind::Lockpick => "Lockpick",
            RecordKind::MiscItem => "MiscItem",
            RecordKind::Probe => "Probe",
            RecordKind::RepairItem => "RepairItem",
            RecordKind::Static => "Static",
            RecordKind::Weapon => "Weapon",
            RecordKind::Other => "Other",
        }
    }

    /// Kinds that can be placed in the world or carried, and therefore
    /// count as orphaned when nothing references them.
    pub fn is_placeable(self) -> bool {
        matches!(
            self,
            RecordKind::Activator
                | RecordKind::Alchemy
                | RecordKind::Apparatus
                | RecordKind::Armor
                | RecordKind::Book
                | RecordKind::Clothing
                | RecordKind::Container
                | RecordKind::Creature
                | RecordKind::Door
                | RecordKind::Ingredient
                | RecordKind::LevelledCreature
                | RecordKind::LevelledItem
                | RecordKind::Light
                | RecordKind::Lockpick
                | RecordKind::MiscItem
                | RecordKind::Npc
                | RecordKind::Probe
                | RecordKind::RepairItem
                | RecordKind::Static
                | RecordKind::Weapon
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Header(_) => RecordKind::Header,
            Record::Cell(_) => RecordKind::Cell,
            Record::PathGrid(_) => RecordKind::PathGrid,
            Record::Dialogue(_) => RecordKind::Dialogue,
            Record::Info(_) => RecordKind::Info,
            Record::Script(_) => RecordKind::Script,
            Record::StartScript(_) => RecordKind::StartScript,
            Record::Enchantment(_) => RecordKind::Enchantment,
            Record::LevelledCreature(_) => RecordKind::LevelledCreature,
            Record::LevelledItem(_) => RecordKind::LevelledItem,
            Record::Container(_) => RecordKind::Container,
            Record::Creature(_) => RecordKind::Creature,
            Record::Npc(_) => RecordKind::Npc,
            Record::Book(_) => RecordKind::Book,
            Record::Activator(_) => RecordKind::Activator,
            Record::Alchemy(_) => RecordKind::Alchemy,
            Record::Apparatus(_) => RecordKind::Apparatus,
            Record::Armor(_) => RecordKind::Armor,
            Record::Clothing(_) => RecordKind::Clothing,
            Record::Door(_) => RecordKind::Door,
            Record::Ingredient(_) => RecordKind::Ingredient,
            Record::Light(_) => RecordKind::Light,
            Record::Lockpick(_) => RecordKind::Lockpick,
            Record::MiscItem(_) => RecordKind::MiscItem,
            Record::Probe(_) => RecordKind::Probe,
            Record::RepairItem(_) => RecordKind::RepairItem,
            Record::Static(_) => RecordKind::Static,
            Record::Weapon(_) => RecordKind::Weapon,
            Record::Other => RecordKind::Other,
        }
    }

    /// The record's editor id, if this kind carries one.
    pub fn id(&self) -> Option<&str> {
        let id = match self {
            Record::Header(_) | Record::PathGrid(_) | Record::Other => return None,
            Record::Cell(r) => &r.id,
            Record::Dialogue(r) => &r.id,
            Record::Info(r) => &r.id,
            Record::Script(r) => &r.id,
            Record::StartScript(r) => &r.id,
            Record::Enchantment(r) => &r.id,
            Record::LevelledCreature(r) | Record::LevelledItem(r) => &r.id,
            Record::Container(r) | Record::Creature(r) | Record::Npc(r) => &r.id,
            Record::Book(r) => &r.id,
            Record::Activator(r)
            | Record::Alchemy(r)
            | Record::Apparatus(r)
            | Record::Armor(r)
            | Record::Clothing(r)
            | Record::Door(r)
            | Record::Ingredient(r)
            | Record::Light(r)
            | Record::Lockpick(r)
            | Record::MiscItem(r)
            | Record::Probe(r)
            | Record::RepairItem(r)
            | Record::Static(r)
            | Record::Weapon(r) => &r.id,
        };
        Some(id.as_str())
    }

    /// The script attached to this record, ignoring empty values.
    pub fn script(&self) -> Option<&str> {
        let script = match self {
            Record::StartScript(r) => &r.script,
            Record::Container(r) | Record::Creature(r) | Record::Npc(r) => &r.script,
            Record::Book(r) => &r.script,
            Record::Activator(r)
            | Record::Alchemy(r)
            | Record::Apparatus(r)
            | Record::Armor(r)
            | Record::Clothing(r)
            | Record::Door(r)
            | Record::Ingredient(r)
            | Record::Light(r)
            | Record::Lockpick(r)
            | Record::MiscItem(r)
            | Record::Probe(r)
            | Record::RepairItem(r)
            | Record::Static(r)
            | Record::Weapon(r) => &r.script,
            _ => return None,
        };
        non_empty(script)
    }

    /// The enchantment applied to this record, ignoring empty values.
    pub fn enchanting(&self) -> Option<&str> {
        let enchanting = match self {
            Record::Book(r) => &r.enchanting,
            Record::Activator(r)
            | Record::Alchemy(r)
            | Record::Apparatus(r)
            | Record::Armor(r)
            | Record::Clothing(r)
            | Record::Door(r)
            | Record::Ingredient(r)
            | Record::Light(r)
            | Record::Lockpick(r)
            | Record::MiscItem(r)
            | Record::Probe(r)
            | Record::RepairItem(r)
            | Record::Static(r)
            | Record::Weapon(r) => &r.enchanting,
            _ => return None,
        };
        non_empty(enchanting)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub data: CellData,
    #[serde(default)]
    pub references: Vec<CellReference>,
}

const FLAG_CELL_INTERIOR: u32 = 0x1;

impl Cell {
    pub fn is_interior(&self) -> bool {
        self.data.flags & FLAG_CELL_INTERIOR != 0
    }

    /// Human readable location: the id for interiors, the name or region
    /// plus grid coordinates for exteriors.
    pub fn display_name(&self) -> String {
        if self.is_interior() {
            return self.id.clone();
        }
        let (x, y) = self.data.grid;
        let name = if self.id.is_empty() {
            self.region.as_deref().unwrap_or_default()
        } else {
            self.id.as_str()
        };
        if name.is_empty() {
            format!("{x},{y}")
        } else {
            format!("{name} {x},{y}")
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellData {
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub grid: (i32, i32),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellReference {
    pub id: String,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub deleted: Option<bool>,
}

impl CellReference {
    pub fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathGrid {
    #[serde(default)]
    pub cell: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum DialogueType {
    #[default]
    Topic,
    Voice,
    Greeting,
    Persuasion,
    Journal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dialogue {
    pub id: String,
    #[serde(default)]
    pub dialogue_type: DialogueType,
}

impl Dialogue {
    pub fn is_journal(&self) -> bool {
        self.dialogue_type == DialogueType::Journal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum QuestState {
    Name,
    Finished,
    Restart,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Result script body.
    #[serde(default, alias = "script_text")]
    pub result: Option<String>,
    #[serde(default)]
    pub data: InfoData,
    #[serde(default)]
    pub quest_state: Option<QuestState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoData {
    #[serde(default)]
    pub disposition: i32,
    #[serde(default)]
    pub dialogue_type: Option<DialogueType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartScript {
    pub id: String,
    #[serde(default)]
    pub script: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Enchantment {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelledList {
    pub id: String,
    #[serde(default)]
    pub list_flags: u32,
    #[serde(default, alias = "creatures", alias = "items")]
    pub entries: Vec<LevelledEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(String, u16)")]
pub struct LevelledEntry {
    pub id: String,
    pub level: u16,
}

impl From<(String, u16)> for LevelledEntry {
    fn from((id, level): (String, u16)) -> Self {
        Self { id, level }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(i32, String)")]
pub struct InventoryEntry {
    pub count: i32,
    pub id: String,
}

impl From<(i32, String)> for InventoryEntry {
    fn from((count, id): (i32, String)) -> Self {
        Self { count, id }
    }
}

/// Containers, creatures and NPCs: anything that carries an inventory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Actor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
    #[serde(default)]
    pub data: Option<ActorData>,
}

impl Actor {
    pub fn is_dead(&self) -> bool {
        let Some(data) = &self.data else {
            return false;
        };
        data.health == Some(0) || data.stats.as_ref().and_then(|s| s.health) == Some(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorData {
    #[serde(default)]
    pub health: Option<i32>,
    #[serde(default)]
    pub stats: Option<ActorStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorStats {
    #[serde(default)]
    pub health: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Book {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub enchanting: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Shared payload of the simple object kinds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Object {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub enchanting: Option<String>,
    #[serde(default)]
    pub mesh: Option<String>,
}
