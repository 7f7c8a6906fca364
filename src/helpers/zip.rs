//! Part lookup inside Office Open XML packages

use crate::error::Error;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

/// Package part access by name, ignoring ASCII case and path separator style.
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Stored name of the part matching `name`
    fn part_name(&self, name: &str) -> Option<String>;

    fn contains(&self, name: &str) -> bool {
        self.part_name(name).is_some()
    }

    /// Opens a part; `None` when the package does not hold it
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, Error>;

    /// Opens a part for event-based XML reading
    fn xml_reader(&'_ mut self, name: &str) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, Error> {
        Ok(self.file(name)?.map(|file| XmlReader::new(BufReader::new(file))))
    }
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn part_name(&self, name: &str) -> Option<String> {
        let wanted = name.replace('\\', "/");
        let wanted = wanted.trim_start_matches('/');
        self.file_names()
            .find(|file_name| wanted.eq_ignore_ascii_case(file_name))
            .map(str::to_owned)
    }

    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, Error> {
        let part = match self.part_name(name) {
            Some(part) => part,
            None => return Ok(None),
        };
        match self.by_name(&part) {
            Ok(file) => Ok(Some(file)),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }
}
