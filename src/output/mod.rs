mod format;
mod json;
mod table;

pub(crate) use json::{output_event_json, output_json, output_navigation_json};
pub(crate) use table::{
    print_guard_decision, print_history_table, print_profile, print_routes_table,
    print_search_table, print_stats,
};
