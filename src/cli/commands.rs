//! CLI subcommand definitions

use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// Page to continue to after signing in
        #[arg(long, default_value = "/home")]
        redirect: String,
    },
    /// Create an account and store the session
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update profile fields
    Profile {
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Ask a legal question
    Ask {
        question: String,
        /// Continue an existing conversation
        #[arg(long)]
        session_id: Option<String>,
        /// Print the answer as it is generated
        #[arg(long)]
        stream: bool,
        /// Stop streaming after this many seconds
        #[arg(long, value_name = "SECS", requires = "stream")]
        cancel_after: Option<f64>,
    },
    /// Show past questions
    History {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Search the knowledge base
    Search {
        #[arg(value_enum)]
        kind: SearchKind,
        keyword: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Show knowledge-base statistics (administrators)
    Stats,
    /// Delete a knowledge-base entry or a Q&A record (administrators)
    Delete {
        #[arg(value_enum)]
        kind: RecordKind,
        id: u64,
    },
    /// Check access to a page, or list all pages
    Route {
        path: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SearchKind {
    /// Statute articles
    Articles,
    /// Court cases
    Cases,
    /// Legal concepts
    Concepts,
}

impl SearchKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SearchKind::Articles => "Articles",
            SearchKind::Cases => "Cases",
            SearchKind::Concepts => "Concepts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RecordKind {
    Article,
    Case,
    Concept,
    /// A stored question and its answer
    Qa,
}

impl RecordKind {
    /// Path segment under `/admin`
    pub(crate) fn resource(self) -> &'static str {
        match self {
            RecordKind::Article => "article",
            RecordKind::Case => "case",
            RecordKind::Concept => "concept",
            RecordKind::Qa => "qa",
        }
    }

    /// Admin page that manages this kind of record
    pub(crate) fn page(self) -> &'static str {
        match self {
            RecordKind::Qa => "/admin/qa",
            _ => "/admin/knowledge",
        }
    }
}
