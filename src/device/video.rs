//! Video adapter device

use crate::error::DeviceError;
use crate::utils::xml::{attributes, Element};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Adapter models every hypervisor is expected to know
const MODEL_TYPES: &[&str] = &["cirrus", "vga", "vmvga", "xen"];

/// A video adapter. Values are not checked against `model_types()`;
/// newer hypervisors accept models this list does not name.
#[derive(Debug, Clone, Default)]
pub struct VideoDevice {
    model_type: Option<String>,
    vram: Option<u64>,
    heads: Option<u32>,
}

impl VideoDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_types(&self) -> Vec<&'static str> {
        MODEL_TYPES.to_vec()
    }

    pub fn model_type(&self) -> Option<&str> {
        self.model_type.as_deref()
    }

    pub fn set_model_type(&mut self, val: Option<String>) {
        self.model_type = val;
    }

    /// Video RAM in KiB
    pub fn vram(&self) -> Option<u64> {
        self.vram
    }

    pub fn set_vram(&mut self, val: Option<u64>) {
        self.vram = val;
    }

    pub fn heads(&self) -> Option<u32> {
        self.heads
    }

    pub fn set_heads(&mut self, val: Option<u32>) {
        self.heads = val;
    }

    pub fn to_xml(&self) -> Result<String, DeviceError> {
        let mut model = Element::new("model").attr_opt("type", self.model_type());
        if let Some(vram) = self.vram {
            model = model.attr("vram", vram);
        }
        if let Some(heads) = self.heads {
            model = model.attr("heads", heads);
        }
        Ok(Element::new("video").child(model).render())
    }

    /// Build a device from the `<model>` of the first `<video>` in `xml`
    pub fn from_xml(xml: &str) -> Result<Self, DeviceError> {
        let mut dev = VideoDevice::new();
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut found = false;
        let mut in_video = false;
        loop {
            match reader.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"video" && !found => {
                    found = true;
                    in_video = true;
                }
                Event::Empty(e) if e.name().as_ref() == b"video" && !found => {
                    found = true;
                }
                Event::Start(e) | Event::Empty(e) if in_video && e.name().as_ref() == b"model" => {
                    let attrs = attributes(&e)?;
                    dev.model_type = attrs.get("type").cloned();
                    dev.vram = attrs.get("vram").map(|v| parse_num(v, "vram")).transpose()?;
                    dev.heads = attrs.get("heads").map(|v| parse_num(v, "heads")).transpose()?;
                }
                Event::End(e) if e.name().as_ref() == b"video" => in_video = false,
                Event::Eof => break,
                _ => {}
            }
        }

        if !found {
            return Err(DeviceError::Xml("no <video> element".into()));
        }
        Ok(dev)
    }
}

fn parse_num<T: std::str::FromStr>(val: &str, what: &str) -> Result<T, DeviceError> {
    val.trim()
        .parse()
        .map_err(|_| DeviceError::invalid(format!("{what} must be a number, got '{val}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev() -> VideoDevice {
        VideoDevice::new()
    }

    #[test]
    fn test_render_bare() {
        assert_eq!(dev().to_xml().unwrap(), "<video>\n  <model/>\n</video>");
    }

    #[test]
    fn test_render_all_attributes() {
        let mut v = dev();
        v.set_model_type(Some("vga".into()));
        v.set_vram(Some(9216));
        v.set_heads(Some(1));
        assert_eq!(
            v.to_xml().unwrap(),
            "<video>\n  <model type='vga' vram='9216' heads='1'/>\n</video>"
        );
    }

    #[test]
    fn test_any_model_accepted() {
        let mut v = dev();
        v.set_model_type(Some("qxl".into()));
        assert!(!v.model_types().contains(&"qxl"));
        assert_eq!(v.model_type(), Some("qxl"));
        assert_eq!(v.to_xml().unwrap(), "<video>\n  <model type='qxl'/>\n</video>");
    }

    #[test]
    fn test_partial_attributes() {
        let mut v = dev();
        v.set_heads(Some(2));
        assert_eq!(v.to_xml().unwrap(), "<video>\n  <model heads='2'/>\n</video>");
    }

    #[test]
    fn test_zero_values_rendered() {
        let mut v = dev();
        v.set_vram(Some(0));
        v.set_heads(Some(0));
        assert_eq!(
            v.to_xml().unwrap(),
            "<video>\n  <model vram='0' heads='0'/>\n</video>"
        );
    }

    #[test]
    fn test_xml_round_trip() {
        let mut v = dev();
        v.set_model_type(Some("cirrus".into()));
        v.set_vram(Some(16384));
        let xml = v.to_xml().unwrap();

        let parsed = VideoDevice::from_xml(&xml).unwrap();
        assert_eq!(parsed.model_type(), Some("cirrus"));
        assert_eq!(parsed.vram(), Some(16384));
        assert_eq!(parsed.heads(), None);
    }

    #[test]
    fn test_from_xml_bad_number() {
        let r = VideoDevice::from_xml("<video><model type='vga' heads='two'/></video>");
        assert!(matches!(r, Err(DeviceError::InvalidValue(_))));
    }
}
