use std::collections::HashMap;

use crate::config::Credentials;
use crate::pools::mode::DEFAULT_MODE;

const GENERAL_PROMPT: &str = "You are a helpful personal assistant. Answer \
    concisely and practically. You help with everyday questions, diet and \
    medication reminders, and task planning.";

const RESEARCH_PROMPT: &str = "You are a research assistant. Give thorough, \
    structured answers, distinguish established facts from speculation, and \
    say so explicitly when you are unsure.";

const STUDY_PROMPT: &str = "You are a patient study tutor. Explain concepts \
    step by step, check understanding with short questions, and prefer worked \
    examples over abstract definitions.";

/// One credential/system-prompt pair within a pool. Order within the pool is
/// failover priority.
#[derive(Debug, Clone)]
pub struct PoolEntry {
    /// Env slot the credential came from; only used for log lines.
    pub slot: &'static str,
    credential: Option<String>,
    pub system_prompt: &'static str,
}

impl PoolEntry {
    fn new(slot: &'static str, credential: &Option<String>, system_prompt: &'static str) -> Self {
        Self {
            slot,
            credential: credential.clone(),
            system_prompt,
        }
    }

    /// The entry's credential, if usable. Blank secrets count as absent.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Mode-keyed table of credential pools. Built once at startup from the
/// environment credentials and read-only afterwards.
#[derive(Debug)]
pub struct PoolTable {
    pools: HashMap<&'static str, Vec<PoolEntry>>,
}

impl PoolTable {
    /// Static wiring of modes to ordered entries. Every dedicated slot fails
    /// over to the shared backup slot, keeping the mode's own prompt.
    pub fn from_credentials(credentials: &Credentials) -> Self {
        let mut pools = HashMap::new();
        pools.insert(
            "general",
            vec![
                PoolEntry::new("main", &credentials.main, GENERAL_PROMPT),
                PoolEntry::new("backup", &credentials.backup, GENERAL_PROMPT),
            ],
        );
        pools.insert(
            "research",
            vec![
                PoolEntry::new("research", &credentials.research, RESEARCH_PROMPT),
                PoolEntry::new("backup", &credentials.backup, RESEARCH_PROMPT),
            ],
        );
        pools.insert(
            "study",
            vec![
                PoolEntry::new("study", &credentials.study, STUDY_PROMPT),
                PoolEntry::new("backup", &credentials.backup, STUDY_PROMPT),
            ],
        );
        Self { pools }
    }

    /// Entries for a mode, in failover order. Unknown modes get the general
    /// pool.
    pub fn entries_for(&self, mode: &str) -> &[PoolEntry] {
        self.pools
            .get(mode)
            .or_else(|| self.pools.get(DEFAULT_MODE))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
