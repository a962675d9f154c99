use serde::Serialize;

use crate::models::contract_dates::DateStatus;
use crate::models::contracts::ContractStatus;

/// What the UI shows for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub label: &'static str,
    pub color_class: &'static str,
    pub icon: &'static str,
}

const DRAFT: Badge = Badge {
    label: "Draft",
    color_class: "bg-slate-100 text-slate-700",
    icon: "file-pen",
};
const PENDING: Badge = Badge {
    label: "Pending",
    color_class: "bg-yellow-100 text-yellow-800",
    icon: "clock",
};
const SENT: Badge = Badge {
    label: "Sent",
    color_class: "bg-blue-100 text-blue-800",
    icon: "send",
};
const ACCEPTED: Badge = Badge {
    label: "Accepted",
    color_class: "bg-green-100 text-green-800",
    icon: "circle-check",
};
const REJECTED: Badge = Badge {
    label: "Rejected",
    color_class: "bg-red-100 text-red-800",
    icon: "circle-x",
};
const CANCELLED: Badge = Badge {
    label: "Cancelled",
    color_class: "bg-gray-200 text-gray-600",
    icon: "ban",
};
const NEEDS_REVISION: Badge = Badge {
    label: "Needs revision",
    color_class: "bg-orange-100 text-orange-800",
    icon: "triangle-alert",
};
/// Unstyled, pending-like.
const NEUTRAL: Badge = Badge {
    label: "Pending",
    color_class: "bg-gray-100 text-gray-800",
    icon: "clock",
};

pub fn resolve_badge(status: &ContractStatus) -> Badge {
    match status {
        ContractStatus::Draft => DRAFT,
        ContractStatus::Pending => PENDING,
        ContractStatus::Sent => SENT,
        ContractStatus::Accepted => ACCEPTED,
        ContractStatus::Rejected => REJECTED,
        ContractStatus::Cancelled => CANCELLED,
        ContractStatus::NeedsRevision => NEEDS_REVISION,
        ContractStatus::Unknown(_) => NEUTRAL,
    }
}

pub fn resolve_date_badge(status: DateStatus) -> Badge {
    match status {
        DateStatus::Pending => PENDING,
        DateStatus::Accepted => ACCEPTED,
        DateStatus::Rejected => REJECTED,
        DateStatus::Cancelled => CANCELLED,
    }
}

/// Badge for a raw status string straight from a payload.
pub fn resolve_badge_str(raw: &str) -> Badge {
    resolve_badge(&ContractStatus::from_str_lossy(raw))
}
