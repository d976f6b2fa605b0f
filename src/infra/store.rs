use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::domain::ticket::{TicketId, TicketStatus};
use crate::error::{AppError, AppResult};
use crate::services::TicketStore;

#[derive(Default, Serialize, Deserialize)]
struct StoreFile {
    tickets: BTreeMap<u64, StoredTicket>,
}

#[derive(Serialize, Deserialize, Clone)]
struct StoredTicket {
    subject: String,
    status: TicketStatus,
}

/// File-backed stand-in for the helpdesk's ticket table.
pub struct JsonTicketStore {
    file_path: PathBuf,
    file: Mutex<StoreFile>,
}

impl JsonTicketStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        let file = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<StoreFile>(&contents).map_err(|err| {
                AppError::TicketStore(format!("invalid ticket store {}: {err}", path.display()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Records a ticket, replacing any previous entry with the same id.
    pub fn insert(&self, id: TicketId, subject: &str, status: TicketStatus) -> AppResult<()> {
        let mut file = self.file.lock();
        file.tickets.insert(
            id.0,
            StoredTicket {
                subject: subject.to_string(),
                status,
            },
        );
        self.save(&file)
    }

    fn save(&self, file: &StoreFile) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(file)
            .map_err(|err| AppError::TicketStore(format!("failed to encode tickets: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }
}

#[async_trait]
impl TicketStore for JsonTicketStore {
    async fn status(&self, id: TicketId) -> AppResult<Option<TicketStatus>> {
        Ok(self.file.lock().tickets.get(&id.0).map(|ticket| ticket.status))
    }

    async fn set_status(&self, id: TicketId, status: TicketStatus) -> AppResult<()> {
        let mut file = self.file.lock();
        let ticket = file
            .tickets
            .get_mut(&id.0)
            .ok_or_else(|| AppError::TicketStore(format!("ticket {id} not found")))?;
        ticket.status = status;
        self.save(&file)
    }
}
