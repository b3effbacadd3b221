use clap::{Args, Subcommand};

mod get;
mod list;
mod sync;

pub(crate) use get::get;
pub(crate) use list::list;
pub(crate) use sync::sync;

#[derive(Subcommand, Clone)]
pub enum ListCommands {
    Items(ListItemsArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ListItemsArgs {
    #[arg(long, help = "Perform a search on the listed objects.")]
    pub search: Option<String>,

    #[arg(long, help = "Filter items by folder id, `null` for items without a folder.")]
    pub folderid: Option<String>,

    #[arg(long, help = "Filter items that are deleted and in the trash.")]
    pub trash: bool,
}

#[derive(Subcommand, Clone)]
pub enum GetCommands {
    Item { id: String },
}
