// VM tag assignments via the Inventory Service
//
// The XQuery below selects every non-template VM, joins it to its tags
// through the `tagging:tagsOnDoc` index and resolves each tag's category.
// The query engine is sensitive to the exact text, so it is kept verbatim in
// `tag_assignments.xq`.

use tracing::warn;

use crate::error::Error;
use crate::query::client::QueryClient;
use crate::xml::XmlElement;

/// The tag-assignment XQuery, byte for byte.
pub const TAG_ASSIGNMENT_QUERY: &str = include_str!("tag_assignments.xq");

/// A tag as reported by the Inventory Service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTag {
    pub name: String,
    pub category: String,
}

impl ServiceTag {
    fn from_element(tag: &XmlElement) -> Self {
        Self {
            name: tag.child_text("name").unwrap_or_default().to_owned(),
            category: tag.child_text("category").unwrap_or_default().to_owned(),
        }
    }
}

/// One `<vm>` block of the tag-assignment query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedVm {
    /// `config.uuid` of the VM: the join key against vim inventory.
    pub uuid: Option<String>,
    pub name: String,
    pub tags: Vec<ServiceTag>,
}

impl TaggedVm {
    pub fn from_element(vm: &XmlElement) -> Self {
        Self {
            uuid: vm
                .child_text("uuid")
                .filter(|u| !u.is_empty())
                .map(String::from),
            name: vm.child_text("name").unwrap_or_default().to_owned(),
            tags: vm
                .child("tags")
                .map(|tags| {
                    tags.children_named("tag")
                        .map(ServiceTag::from_element)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl QueryClient {
    /// Run the tag-assignment query and decode every tagged VM.
    pub async fn tagged_vms(&self) -> Result<Vec<TaggedVm>, Error> {
        let rows = self.query(TAG_ASSIGNMENT_QUERY).await?;

        Ok(rows
            .iter()
            .filter(|row| {
                let is_vm = row.name() == "vm";
                if !is_vm {
                    warn!(element = row.name(), "skipping unexpected result row");
                }
                is_vm
            })
            .map(TaggedVm::from_element)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn query_text_is_verbatim() {
        assert!(TAG_ASSIGNMENT_QUERY.starts_with("\n    declare namespace qs = 'urn:vmware:queryservice';"));
        assert!(TAG_ASSIGNMENT_QUERY.contains(
            "let $vms := doc('.')/VirtualMachine[config/template = 'false']"
        ));
        assert!(TAG_ASSIGNMENT_QUERY.ends_with("return $vmsWithTags[@id]\n    "));
    }

    #[test]
    fn decodes_tagged_vm_block() {
        let xml = r#"<vm id="vm-101">
              <uuid>4231-aaaa</uuid>
              <name>web-1</name>
              <parent type="Folder">group-v3</parent>
              <tags>
                <tag id="tag-1"><category id="cat-1">Role</category><name>webserver</name><description>Front end</description></tag>
                <tag id="tag-2"><category id="cat-2">Env</category><name>production</name><description/></tag>
              </tags>
            </vm>"#;

        let vm = TaggedVm::from_element(&XmlElement::parse(xml).unwrap());

        assert_eq!(
            vm,
            TaggedVm {
                uuid: Some("4231-aaaa".into()),
                name: "web-1".into(),
                tags: vec![
                    ServiceTag {
                        name: "webserver".into(),
                        category: "Role".into(),
                    },
                    ServiceTag {
                        name: "production".into(),
                        category: "Env".into(),
                    },
                ],
            }
        );
    }

    #[test]
    fn block_without_tags_has_empty_list() {
        let vm = TaggedVm::from_element(&XmlElement::parse("<vm><uuid>u</uuid><name>n</name></vm>").unwrap());
        assert!(vm.tags.is_empty());
    }
}
