//! French and Arabic labels for record fields and user-facing messages.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Display language. Parsing trims and ignores case, both from strings and
/// from serde input (`?lang=AR` is Arabic).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::Ar => "ar",
        }
    }

    /// Arabic is laid out right to left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Ar)
    }

    fn pick(&self, fr: &'static str, ar: &'static str) -> &'static str {
        match self {
            Self::Fr => fr,
            Self::Ar => ar,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "ar" => Ok(Self::Ar),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// (field, French, Arabic)
const FIELD_LABELS: &[(&str, &str, &str)] = &[
    ("bo_number", "N° BO", "رقم البريد"),
    ("number", "N°", "الرقم"),
    ("arrival_date", "Date Arrivée", "تاريخ الوصول"),
    ("date", "Date", "التاريخ"),
    ("sender", "Expéditeur", "المرسل"),
    ("recipient", "Destinataire", "المستلم"),
    ("subject", "Objet", "الموضوع"),
    ("nature", "Nature", "الطبيعة"),
    ("orientation", "Orientation", "التوجيه"),
    ("reference", "Référence", "المرجع"),
    ("reference_number", "N° Réf.", "رقم المرجع"),
    ("reference_date", "Date Réf.", "تاريخ المرجع"),
    ("observation", "Observations", "ملاحظات"),
];

/// Label of a domain field. Unknown fields are returned as-is.
pub fn field_label<'a>(field: &'a str, lang: Language) -> &'a str {
    FIELD_LABELS
        .iter()
        .find(|(key, _, _)| *key == field)
        .map(|&(_, fr, ar)| lang.pick(fr, ar))
        .unwrap_or(field)
}

/// Outcome messages shown to the user as toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Saved,
    Updated,
    Deleted,
    SaveFailed,
    DeleteFailed,
    SearchFailed,
    LoadFailed,
    ServerUnavailable,
    NothingToExport,
    NotFound,
    FieldRequired,
    NotSpecified,
}

impl Message {
    pub fn text(&self, lang: Language) -> &'static str {
        match self {
            Self::Saved => lang.pick("Enregistré avec succès", "تم الحفظ بنجاح"),
            Self::Updated => lang.pick("Modifié avec succès", "تم التعديل بنجاح"),
            Self::Deleted => lang.pick("Supprimé avec succès", "تم الحذف بنجاح"),
            Self::SaveFailed => lang.pick("Erreur lors de l'enregistrement", "خطأ أثناء الحفظ"),
            Self::DeleteFailed => lang.pick("Erreur lors de la suppression", "خطأ أثناء الحذف"),
            Self::SearchFailed => lang.pick("Erreur lors de la recherche", "خطأ أثناء البحث"),
            Self::LoadFailed => lang.pick("Erreur lors du chargement", "خطأ أثناء التحميل"),
            Self::ServerUnavailable => lang.pick(
                "Le serveur n'est pas disponible",
                "الخادم غير متاح",
            ),
            Self::NothingToExport => lang.pick("Aucune donnée à exporter", "لا توجد بيانات للتصدير"),
            Self::NotFound => lang.pick("Enregistrement introuvable", "السجل غير موجود"),
            Self::FieldRequired => lang.pick("Champ obligatoire", "حقل إلزامي"),
            Self::NotSpecified => lang.pick("Non spécifié", "غير محدد"),
        }
    }
}
