use crate::wire::{Validate, wire_enum};
use serde::Serialize;

wire_enum! {
    /// Whether OCR may alter the page image to improve text recognition.
    pub enum OcrSupportedType {
        SearchableImage => "searchable_image",
        /// Keeps the original image untouched.
        SearchableImageExact => "searchable_image_exact",
    }
}

wire_enum! {
    /// Recognition languages accepted by the OCR service.
    pub enum OcrSupportedLocale {
        BgBg => "bg-BG",
        CaCa => "ca-CA",
        CsCz => "cs-CZ",
        DaDk => "da-DK",
        DeCh => "de-CH",
        DeDe => "de-DE",
        ElGr => "el-GR",
        EnGb => "en-GB",
        EnUs => "en-US",
        EsEs => "es-ES",
        EtEe => "et-EE",
        FiFi => "fi-FI",
        FrFr => "fr-FR",
        HrHr => "hr-HR",
        HuHu => "hu-HU",
        ItIt => "it-IT",
        IwIl => "iw-IL",
        JaJp => "ja-JP",
        KoKr => "ko-KR",
        LtLt => "lt-LT",
        LvLv => "lv-LV",
        MkMk => "mk-MK",
        MtMt => "mt-MT",
        NbNo => "nb-NO",
        NlNl => "nl-NL",
        NoNo => "no-NO",
        PlPl => "pl-PL",
        PtBr => "pt-BR",
        RoRo => "ro-RO",
        RuRu => "ru-RU",
        SkSk => "sk-SK",
        SlSi => "sl-SI",
        SrSr => "sr-SR",
        SvSe => "sv-SE",
        TrTr => "tr-TR",
        UkUa => "uk-UA",
        ZhCn => "zh-CN",
        ZhHk => "zh-HK",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    ocr_type: Option<OcrSupportedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ocr_lang: Option<OcrSupportedLocale>,
}

impl OcrOptions {
    #[must_use]
    pub fn builder() -> OcrOptionsBuilder {
        OcrOptionsBuilder::default()
    }

    #[must_use]
    pub fn ocr_type(&self) -> Option<OcrSupportedType> {
        self.ocr_type
    }

    #[must_use]
    pub fn ocr_lang(&self) -> Option<OcrSupportedLocale> {
        self.ocr_lang
    }
}

impl Validate for OcrOptions {
    fn violations(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
pub struct OcrOptionsBuilder {
    ocr_type: Option<OcrSupportedType>,
    ocr_lang: Option<OcrSupportedLocale>,
}

impl OcrOptionsBuilder {
    #[must_use]
    pub fn ocr_type(mut self, ocr_type: OcrSupportedType) -> Self {
        self.ocr_type = Some(ocr_type);
        self
    }

    #[must_use]
    pub fn ocr_lang(mut self, lang: OcrSupportedLocale) -> Self {
        self.ocr_lang = Some(lang);
        self
    }

    #[must_use]
    pub fn build(self) -> OcrOptions {
        OcrOptions {
            ocr_type: self.ocr_type,
            ocr_lang: self.ocr_lang,
        }
    }
}
