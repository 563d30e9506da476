use std::collections::HashMap;

use crate::schema::CommentView;
use crate::types::comment::CommentNode;
use crate::types::id::CommentId;

/// Arranges the comments of a post into a tree.
///
/// `comments` must be sorted by creation time. Comments are grouped
/// by their parent, keeping the input order inside each group, then
/// every group is attached to its parent starting from the top-level
/// comments. A comment whose parent is not in `comments` is dropped
/// along with its replies.
#[must_use]
pub fn build_comment_tree(comments: Vec<CommentView>) -> Vec<CommentNode> {
  let mut groups: HashMap<Option<CommentId>, Vec<CommentView>> = HashMap::new();
  for comment in comments {
    groups.entry(comment.parent_id).or_default().push(comment);
  }

  let top_level = groups.remove(&None).unwrap_or_default();
  attach_replies(top_level, &mut groups)
}

// Groups are taken out of the map once attached, so a cycle of parent
// links can never be visited twice.
fn attach_replies(
  level: Vec<CommentView>,
  groups: &mut HashMap<Option<CommentId>, Vec<CommentView>>,
) -> Vec<CommentNode> {
  level
    .into_iter()
    .map(|comment| {
      let replies = groups.remove(&Some(comment.id)).unwrap_or_default();
      let replies = attach_replies(replies, groups);
      CommentNode::new(comment, replies)
    })
    .collect()
}
