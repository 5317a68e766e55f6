//! Help texts, one per level of the command tree

macro_rules! root_help {
    () => {
        "\
?           print this help message
create      create various objects (such as hosts and tags)
delete      delete various objects (such as hosts and tags)
describe    print details about various data
echo        print text back to the console
help        alias for ?
host        manipulate a host
rename      rename various objects (such as hosts and tags)
show        print various data
tag         manipulate a tag
version     display Isidore version information"
    };
}

pub const ROOT: &str = root_help!();

pub const HELP_WORD: &str = concat!(
    "\
Pst! You should really use ? to display the help message. ? works at
every subprompt level. help only works at the root prompt.

",
    root_help!()
);

pub const SUBPROMPT: &str = "\
^C          clear the current command
^D          alias for end
end         go back to the previous prompt
quit        exit";

pub const SHOW: &str = "\
?           print this help message
config      print the commands that recreate the current database
hosts       print all commissioned hosts in the database
graveyard   print all decommissioned hosts in the database
inventory   print the full Ansible inventory
tag-groups  print all the tag groups in the database
tags        print all tags in the database";

pub const SHOW_INVENTORY: &str = "\
?           print this help message
human       print the inventory in a human friendly format
ini         print the inventory in INI format (default)
json        print the inventory in JSON format
yaml        print the inventory in YAML format";

pub const DESCRIBE: &str = "\
?           print this help message
hosts       describe all commissioned hosts in the database
graveyard   describe all decommissioned hosts in the database
tag-groups  describe all the tag groups in the database
tags        describe all tags in the database";

pub const CREATE: &str = "\
?           print this help message
host        create a new host
tag         create a new tag";

pub const CREATE_HOST: &str = "\
?           print this help message
<hostname>  the hostname for the new host to create";

pub const CREATE_TAG: &str = "\
?           print this help message
<name>      the name of the new tag to create";

pub const DELETE: &str = "\
?           print this help message
host        delete a host
tag         delete a tag";

pub const DELETE_HOST: &str = "\
?           print this help message
<hostname>  the hostname of the host to delete";

pub const DELETE_TAG: &str = "\
?           print this help message
<name>      the name of the tag to delete";

pub const RENAME: &str = "\
?           print this help message
host        rename a host
tag         rename a tag";

pub const RENAME_HOST_OLD: &str = "\
?           print this help message
<hostname>  the old hostname";

pub const RENAME_HOST_NEW: &str = "\
?           print this help message
<hostname>  the new hostname";

pub const RENAME_TAG_OLD: &str = "\
?           print this help message
<name>      the old tag name";

pub const RENAME_TAG_NEW: &str = "\
?           print this help message
<name>      the new tag name";

pub const RENAME_NEEDS_BOTH: &str = "\
Rename does not open a subprompt for the new name. Enter the old and new
names at the same time:

    > rename host foo bar

Enter ? as any argument for help.";

pub const ECHO: &str = "\
?           print this help message
<text>      text to print";

pub const HOST: &str = "\
?           print this help message
<hostname>  the name of the host to edit";

pub const HOST_ACTIONS: &str = "\
?           print this help message
describe    print details about host attributes
set         modify host attributes
show        display host attributes
tag         display and modify this host's tags
var         display and modify this host's variables";

pub const HOST_DESCRIBE: &str = "\
?           print this help message
tags        describe the tags currently assigned to this host";

pub const HOST_SHOW: &str = "\
?           print this help message
all             print all the information about the host
commissioned    print the date the host was commissioned
decommissioned  print the date the host was decommissioned
description     print the host's description
tags            print the tags currently assigned to this host";

pub const HOST_SET: &str = "\
?           print this help message
commissioned    set the date the host was commissioned
decommissioned  set the date the host was decommissioned
description     set the host's description";

pub const HOST_SET_COMMISSIONED: &str = "\
<date>      the commission date, YYYY-MM-DD [HH:MM:SS]
none        clear the commission date
now         use the current date";

pub const HOST_SET_DECOMMISSIONED: &str = "\
<date>      the decommission date, YYYY-MM-DD [HH:MM:SS]
none        clear the decommission date
now         use the current date";

pub const SET_DESCRIPTION: &str = "\
<description>   the description
none            clear the description";

pub const HOST_TAG: &str = "\
?           print this help message
add         add a tag to this host
list        list the tags currently assigned to this host
list-detail display a detailed list of tags currently assigned to this host
remove      remove a tag from this host";

pub const HOST_TAG_ADD: &str = "\
?           print this help message
<tag>       name of the tag to add";

pub const HOST_TAG_REMOVE: &str = "\
?           print this help message
<tag>       name of the tag to remove";

pub const TAG: &str = "\
?           print this help message
<tagname>   the name of the tag to edit";

pub const TAG_ACTIONS: &str = "\
?           print this help message
describe    print details about tag attributes
host        display and modify hosts that have this tag
set         modify tag attributes
show        display tag attributes
var         display and modify this tag's variables";

pub const TAG_DESCRIBE: &str = "\
?           print this help message
hosts       describe the hosts currently assigned to this tag";

pub const TAG_SHOW: &str = "\
?           print this help message
all         print all the information about the tag
description print the tag's description
group       print the tag's group
hosts       print all hosts that have this tag";

pub const TAG_SET: &str = "\
?           print this help message
description     set the tag's description
group           set the tag's group";

pub const TAG_SET_GROUP: &str = "\
<group>     the tag group
none        remove the tag from its group";

pub const TAG_HOST: &str = "\
?           print this help message
add         assign hosts to this tag
list        display all hosts that have this tag
remove      remove hosts from this tag";

pub const TAG_HOST_ADD: &str = "\
?           print this help message
<host>      name of the host to add";

pub const TAG_HOST_REMOVE: &str = "\
?           print this help message
<host>      name of the host to remove";

pub const VAR: &str = "\
?           print this help message
append      append a value to a list variable
print       print a variable
set         set a variable
unset       unset (delete) a variable";

pub const VAR_PRINT: &str = "\
?           print this help message
$           print all variables
<variable>  name of the variable to print";

pub const VAR_SET_PATH: &str = "\
?           print this help message
$           set/replace the entire variable tree
<variable>  name of the variable to set";

pub const VAR_SET_VALUE: &str = "\
?           print this help message
<json>      the JSON value to set the variable to";

pub const VAR_APPEND_PATH: &str = "\
?           print this help message
<variable>  name of the list variable to append to";

pub const VAR_APPEND_VALUE: &str = "\
?           print this help message
<json>      the JSON value to append to the list";

pub const VAR_UNSET: &str = "\
?           print this help message
<variable>  name of the variable to unset";

pub const NO_ARGUMENTS: &str = "\
?           print this help message
            this command takes no arguments";
